use crate::error::{GraphError, Result};
use crate::propagation::{PropagationEngine, PropagationReport};
use crate::types::{Edge, Node, NodeData, NodeDataPatch, NodeId, NodeKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// A node together with its current data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeEntry {
    pub id: NodeId,
    pub kind: NodeKind,
    pub data: NodeData,
}

/// Owned copy of the whole graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeEntry>,
    pub edges: Vec<Edge>,
}

/// Owner of nodes, edges and node data.
///
/// Every mutation takes `&mut self`, so callers sharing a store must
/// serialize writes (see [`crate::SharedGraph`]). Reads hand out clones.
#[derive(Debug, Default)]
pub struct GraphStore {
    nodes: Vec<Node>,
    data: HashMap<NodeId, NodeData>,
    edges: Vec<Edge>,
    incarnations: HashMap<NodeId, u64>,
    next_incarnation: u64,
    engine: PropagationEngine,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_engine(engine: PropagationEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.contains(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }

        self.next_incarnation += 1;
        self.incarnations.insert(node.id.clone(), self.next_incarnation);
        self.data.insert(node.id.clone(), NodeData::for_kind(node.kind));
        info!(node_id = %node.id, kind = %node.kind, "Node added");
        self.nodes.push(node);
        Ok(())
    }

    /// Removes the node, every edge touching it, and its data
    pub fn remove_node(&mut self, id: &str) -> Result<Node> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;

        let node = self.nodes.remove(index);
        let before = self.edges.len();
        self.edges.retain(|edge| !edge.touches(id));
        self.data.remove(id);
        self.incarnations.remove(id);

        info!(
            node_id = %id,
            edges_removed = before - self.edges.len(),
            "Node removed"
        );
        Ok(node)
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains(endpoint) {
                return Err(GraphError::InvalidEdge {
                    from: edge.source.clone(),
                    to: edge.target.clone(),
                    missing: endpoint.clone(),
                });
            }
        }
        if self.edges.contains(&edge) {
            return Err(GraphError::DuplicateEdge {
                from: edge.source,
                to: edge.target,
            });
        }

        debug!(source = %edge.source, target = %edge.target, "Edge added");
        self.edges.push(edge);
        Ok(())
    }

    /// Returns whether an edge was removed
    pub fn remove_edge(&mut self, source: &str, target: &str) -> bool {
        let before = self.edges.len();
        self.edges
            .retain(|edge| !(edge.source == source && edge.target == target));
        before != self.edges.len()
    }

    /// Shallow-merges `patch` into the node's data, then pushes any produced
    /// value one hop downstream.
    ///
    /// Downstream writes go through the same merge but never fan out again,
    /// so a cycle cannot cascade. An empty patch changes nothing.
    pub fn update_node_data(&mut self, id: &str, patch: NodeDataPatch) -> Result<PropagationReport> {
        let emitted = self.merge(id, patch)?;

        let Some(value) = emitted else {
            return Ok(PropagationReport::empty(id));
        };

        let plan = self
            .engine
            .plan(&self.edges, id, &value, |target| self.kind_of(target));

        let mut report = PropagationReport::empty(id);
        for (target, derived) in plan {
            self.merge(&target, derived)?;
            if !report.updated.contains(&target) {
                report.updated.push(target);
            }
        }

        debug!(
            node_id = %id,
            downstream = report.updated.len(),
            "Output propagated"
        );
        Ok(report)
    }

    /// Validates and commits one patch; returns the value it publishes
    fn merge(&mut self, id: &str, patch: NodeDataPatch) -> Result<Option<String>> {
        let data = self
            .data
            .get_mut(id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;

        if let Some(field) = data.rejected_field(&patch) {
            return Err(GraphError::FieldMismatch {
                node: id.to_string(),
                kind: data.kind(),
                field,
            });
        }

        let emitted = data.emitted_by(&patch);
        data.apply(patch);
        Ok(emitted)
    }

    pub fn get_node_data(&self, id: &str) -> Result<NodeData> {
        self.data
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    pub fn get_node(&self, id: &str) -> Result<Node> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .cloned()
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))
    }

    pub fn list_nodes(&self) -> Vec<Node> {
        self.nodes.clone()
    }

    pub fn list_edges(&self) -> Vec<Edge> {
        self.edges.clone()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.iter().any(|node| node.id == id)
    }

    /// Identity of the node's current lifetime; re-adding an id yields a new one
    pub fn incarnation(&self, id: &str) -> Option<u64> {
        self.incarnations.get(id).copied()
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .nodes
            .iter()
            .filter_map(|node| {
                self.data.get(&node.id).map(|data| NodeEntry {
                    id: node.id.clone(),
                    kind: node.kind,
                    data: data.clone(),
                })
            })
            .collect();

        GraphSnapshot {
            nodes,
            edges: self.edges.clone(),
        }
    }

    fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.data.get(id).map(NodeData::kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GraphStore {
        let mut store = GraphStore::new();
        store.add_node(Node::input("in")).unwrap();
        store.add_node(Node::llm("llm")).unwrap();
        store.add_node(Node::output("out")).unwrap();
        store
    }

    #[test]
    fn test_add_node_inserts_default_data() {
        let store = store();
        assert_eq!(store.get_node_data("out").unwrap(), NodeData::for_kind(NodeKind::Output));
        assert_eq!(store.list_nodes().len(), 3);
    }

    #[test]
    fn test_duplicate_node_rejected() {
        let mut store = store();
        let err = store.add_node(Node::output("out")).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode("out".into()));
    }

    #[test]
    fn test_edge_endpoints_must_exist() {
        let mut store = store();
        let err = store.add_edge(Edge::new("in", "ghost")).unwrap_err();
        assert!(matches!(err, GraphError::InvalidEdge { missing, .. } if missing == "ghost"));
        assert!(store.list_edges().is_empty());
    }

    #[test]
    fn test_duplicate_edge_rejected() {
        let mut store = store();
        store.add_edge(Edge::new("in", "llm")).unwrap();
        let err = store.add_edge(Edge::new("in", "llm")).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateEdge { .. }));
        assert_eq!(store.list_edges().len(), 1);
    }

    #[test]
    fn test_remove_edge() {
        let mut store = store();
        store.add_edge(Edge::new("in", "llm")).unwrap();
        assert!(store.remove_edge("in", "llm"));
        assert!(!store.remove_edge("in", "llm"));
    }

    #[test]
    fn test_update_unknown_node() {
        let mut store = store();
        let err = store
            .update_node_data("ghost", NodeDataPatch::new().value("x"))
            .unwrap_err();
        assert_eq!(err, GraphError::UnknownNode("ghost".into()));
    }

    #[test]
    fn test_field_mismatch_leaves_data_untouched() {
        let mut store = store();
        let patch = NodeDataPatch::new().value("v").api_key("k");
        let err = store.update_node_data("out", patch).unwrap_err();
        assert!(matches!(err, GraphError::FieldMismatch { field: "apiKey", .. }));
        assert_eq!(store.get_node_data("out").unwrap(), NodeData::for_kind(NodeKind::Output));
    }

    #[test]
    fn test_incarnation_changes_on_readd() {
        let mut store = store();
        let first = store.incarnation("llm").unwrap();
        store.remove_node("llm").unwrap();
        assert_eq!(store.incarnation("llm"), None);
        store.add_node(Node::llm("llm")).unwrap();
        assert_ne!(store.incarnation("llm").unwrap(), first);
    }

    #[test]
    fn test_snapshot_keeps_insertion_order() {
        let mut store = store();
        store.add_edge(Edge::new("llm", "out")).unwrap();
        let snapshot = store.snapshot();
        let ids: Vec<_> = snapshot.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["in", "llm", "out"]);
        assert_eq!(snapshot.edges, vec![Edge::new("llm", "out")]);
    }
}
