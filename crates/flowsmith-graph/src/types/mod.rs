pub mod data;
pub mod node;

pub use data::{InputData, LlmData, NodeData, NodeDataPatch, OutputData};
pub use node::{Edge, Node, NodeId, NodeKind};
