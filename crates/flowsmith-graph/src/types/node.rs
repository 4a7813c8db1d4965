use serde::{Deserialize, Serialize};
use std::fmt;

pub type NodeId = String;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Input,
    #[serde(rename = "llm")]
    LLM,
    Output,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Input => "input",
            NodeKind::LLM => "llm",
            NodeKind::Output => "output",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Node with a fresh `{kind}-{uuid}` id
    pub fn generated(kind: NodeKind) -> Self {
        Self::new(format!("{}-{}", kind, uuid::Uuid::new_v4()), kind)
    }

    pub fn input(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Input)
    }

    pub fn llm(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::LLM)
    }

    pub fn output(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Output)
    }
}

/// Directed connection from one node's output to another node's input
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serde() {
        assert_eq!(serde_json::to_value(NodeKind::LLM).unwrap(), "llm");
        let kind: NodeKind = serde_json::from_str("\"output\"").unwrap();
        assert_eq!(kind, NodeKind::Output);
    }

    #[test]
    fn test_generated_id_prefix() {
        let node = Node::generated(NodeKind::Input);
        assert!(node.id.starts_with("input-"));
        assert_ne!(node.id, Node::generated(NodeKind::Input).id);
    }

    #[test]
    fn test_edge_touches() {
        let edge = Edge::new("a", "b");
        assert!(edge.touches("a"));
        assert!(edge.touches("b"));
        assert!(!edge.touches("c"));
    }
}
