//! # Flowsmith
//!
//! Compose small workflows of typed nodes (text input, LLM call, text output),
//! wire them together and run them against several LLM providers behind one
//! request/response/error contract.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use flowsmith::prelude::*;
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut graph = GraphStore::new();
//!     graph.add_node(Node::input("question"))?;
//!     graph.add_node(Node::llm("model"))?;
//!     graph.add_node(Node::output("answer"))?;
//!     graph.add_edge(Edge::new("question", "model"))?;
//!     graph.add_edge(Edge::new("model", "answer"))?;
//!
//!     graph.update_node_data(
//!         "model",
//!         NodeDataPatch::new().model("gpt-4").api_key(std::env::var("OPENAI_API_KEY")?),
//!     )?;
//!     graph.update_node_data("question", NodeDataPatch::new().value("Hello!"))?;
//!
//!     let dispatcher = Dispatcher::from_config(&ProviderEndpoints::default(), DispatchConfig::default())?;
//!     let executor = NodeExecutor::new(Arc::new(Mutex::new(graph)), dispatcher);
//!
//!     if let ExecutionOutcome::Committed { output, .. } = executor.execute("model").await? {
//!         println!("{}", output);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - **`flowsmith-llm`**: provider adapters (OpenAI, Gemini, Deepseek), registry and dispatcher
//! - **`flowsmith-graph`**: node/edge store, one-hop propagation, node execution
//! - **`flowsmith-persist`**: chat sessions and chat turns over the shared dispatcher
//!
//! The HTTP server lives in `flowsmith-api` and is not re-exported here.
//!
//! ## License
//!
//! MIT

pub mod prelude;

pub use flowsmith_llm::{
    AdapterRegistry, DeclaredRange, DeepseekAdapter, DispatchConfig, Dispatcher,
    GeminiAdapter, GenerationError, GenerationErrorKind, GenerationRequest, GenerationResult,
    HttpTransport, ModelConfig, OpenAIAdapter, ProviderAdapter, ProviderEndpoints, ProviderKind,
    Transport, TransportError,
};

pub use flowsmith_graph::{
    DiscardReason, Edge, ExecutionError, ExecutionOutcome, GraphError, GraphSnapshot, GraphStore,
    KindMergeRule, MergeRule, Node, NodeData, NodeDataPatch, NodeExecutor, NodeId, NodeKind,
    PropagationEngine, PropagationReport, SharedGraph,
};

pub use flowsmith_persist::{
    derive_title, ChatMessage, ChatService, ChatSession, ChatTurn, InMemorySessionStore, Sender,
    SessionError, SessionStore,
};
