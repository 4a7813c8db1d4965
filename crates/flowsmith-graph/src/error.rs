use crate::types::{NodeId, NodeKind};
use flowsmith_llm::GenerationError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("Invalid edge {from} -> {to}: unknown endpoint {missing}")]
    InvalidEdge {
        from: NodeId,
        to: NodeId,
        missing: NodeId,
    },

    #[error("Edge {from} -> {to} already exists")]
    DuplicateEdge { from: NodeId, to: NodeId },

    #[error("Node already exists: {0}")]
    DuplicateNode(NodeId),

    #[error("Unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("Field '{field}' does not exist on {kind} node {node}")]
    FieldMismatch {
        node: NodeId,
        kind: NodeKind,
        field: &'static str,
    },

    #[error("Node {node} is a {kind} node and cannot be executed")]
    NotExecutable { node: NodeId, kind: NodeKind },
}

pub type Result<T> = std::result::Result<T, GraphError>;

/// Failure of a node execution: either the graph rejected it up front
/// or the dispatcher returned a normalized generation error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExecutionError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}
