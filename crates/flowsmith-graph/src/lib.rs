pub mod error;
pub mod executor;
pub mod propagation;
pub mod store;
pub mod types;

pub use error::{ExecutionError, GraphError};
pub use executor::{DiscardReason, ExecutionOutcome, NodeExecutor, SharedGraph};
pub use propagation::{KindMergeRule, MergeRule, PropagationEngine, PropagationReport};
pub use store::{GraphSnapshot, GraphStore, NodeEntry};
pub use types::{
    Edge, InputData, LlmData, Node, NodeData, NodeDataPatch, NodeId, NodeKind, OutputData,
};
