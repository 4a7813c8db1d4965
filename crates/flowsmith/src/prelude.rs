//! Prelude module for convenient imports
//!
//! Import everything you need with:
//! ```rust
//! use flowsmith::prelude::*;
//! ```

pub use crate::{
    DispatchConfig, Dispatcher, GenerationError, GenerationErrorKind, GenerationRequest,
    GenerationResult, ModelConfig, ProviderAdapter, ProviderEndpoints,
    Edge, ExecutionOutcome, GraphStore, Node, NodeData, NodeDataPatch, NodeExecutor, NodeKind,
    ChatMessage, ChatService, ChatSession, InMemorySessionStore, SessionStore,
};
