use crate::types::{Edge, NodeDataPatch, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Decides what a downstream node receives when an upstream node produces a value
pub trait MergeRule: Send + Sync {
    fn derive(&self, target: NodeKind, value: &str) -> Option<NodeDataPatch>;
}

/// Default rule:
/// LLM target -> `inputValue`, Output target -> `value`, Input target -> nothing
pub struct KindMergeRule;

impl MergeRule for KindMergeRule {
    fn derive(&self, target: NodeKind, value: &str) -> Option<NodeDataPatch> {
        match target {
            NodeKind::LLM => Some(NodeDataPatch::new().input_value(value)),
            NodeKind::Output => Some(NodeDataPatch::new().value(value)),
            // Inputs are not computed
            NodeKind::Input => None,
        }
    }
}

/// Which downstream nodes one update call touched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
    pub source: NodeId,
    pub updated: Vec<NodeId>,
}

impl PropagationReport {
    pub fn empty(source: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            updated: Vec::new(),
        }
    }
}

/// Plans the one-hop fan-out of a produced value.
///
/// The engine never writes node data itself: it hands back derived patches
/// in edge insertion order and the store commits them. When several edges
/// share a target, the later edge wins.
#[derive(Clone)]
pub struct PropagationEngine {
    rule: Arc<dyn MergeRule>,
}

impl PropagationEngine {
    pub fn new(rule: Arc<dyn MergeRule>) -> Self {
        Self { rule }
    }

    pub fn plan<F>(
        &self,
        edges: &[Edge],
        source: &str,
        value: &str,
        kind_of: F,
    ) -> Vec<(NodeId, NodeDataPatch)>
    where
        F: Fn(&str) -> Option<NodeKind>,
    {
        edges
            .iter()
            .filter(|edge| edge.source == source)
            .filter_map(|edge| {
                let kind = kind_of(&edge.target)?;
                self.rule
                    .derive(kind, value)
                    .map(|patch| (edge.target.clone(), patch))
            })
            .collect()
    }
}

impl Default for PropagationEngine {
    fn default() -> Self {
        Self::new(Arc::new(KindMergeRule))
    }
}

impl std::fmt::Debug for PropagationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagationEngine").finish_non_exhaustive()
    }
}
