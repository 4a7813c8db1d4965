use crate::config::Config;
use flowsmith_graph::{GraphStore, NodeExecutor, SharedGraph};
use flowsmith_llm::Dispatcher;
use flowsmith_persist::{ChatService, InMemorySessionStore, SessionStore};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared application state passed to all handlers
///
/// One dispatcher is built at startup and shared by graph execution,
/// chat turns and the direct generate endpoint.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub dispatcher: Dispatcher,
    pub executor: NodeExecutor,
    pub chat: ChatService,
}

impl AppState {
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let dispatcher = Dispatcher::from_config(&config.providers, config.dispatch)?;
        Ok(Self::new(config, dispatcher))
    }

    pub fn new(config: Config, dispatcher: Dispatcher) -> Self {
        let graph: SharedGraph = Arc::new(Mutex::new(GraphStore::new()));
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());

        Self {
            config: Arc::new(config),
            executor: NodeExecutor::new(graph, dispatcher.clone()),
            chat: ChatService::new(sessions, dispatcher.clone()),
            dispatcher,
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        self.executor.graph()
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        self.chat.store()
    }
}
