use crate::error::{ExecutionError, GraphError};
use crate::propagation::PropagationReport;
use crate::store::GraphStore;
use crate::types::{NodeData, NodeDataPatch, NodeId};
use flowsmith_llm::{Dispatcher, ModelConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Graph shared between request handlers; one writer at a time
pub type SharedGraph = Arc<Mutex<GraphStore>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardReason {
    /// Node was deleted (or deleted and re-added) while the call was in flight
    NodeRemoved,
    /// A newer execution of the same node was started
    Superseded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    Committed {
        output: String,
        config: ModelConfig,
        report: PropagationReport,
    },
    Discarded {
        reason: DiscardReason,
    },
}

/// Ticket identifying one execution of one node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    incarnation: u64,
    sequence: u64,
}

/// Latest ticket per node with an execution still in flight.
/// Sequences are unique across nodes, so releasing an entry never lets an
/// older ticket match again.
#[derive(Debug, Default)]
struct TicketBook {
    next: u64,
    latest: HashMap<NodeId, u64>,
}

impl TicketBook {
    fn issue(&mut self, node_id: &str) -> u64 {
        self.next += 1;
        self.latest.insert(node_id.to_string(), self.next);
        self.next
    }

    fn is_latest(&self, node_id: &str, sequence: u64) -> bool {
        self.latest.get(node_id) == Some(&sequence)
    }

    fn release(&mut self, node_id: &str, sequence: u64) {
        if self.is_latest(node_id, sequence) {
            self.latest.remove(node_id);
        }
    }
}

/// Runs LLM nodes: snapshot under the lock, dispatch without it, commit once.
#[derive(Clone)]
pub struct NodeExecutor {
    graph: SharedGraph,
    dispatcher: Dispatcher,
    tickets: Arc<StdMutex<TicketBook>>,
    active_config: Arc<StdMutex<Option<ModelConfig>>>,
}

impl NodeExecutor {
    pub fn new(graph: SharedGraph, dispatcher: Dispatcher) -> Self {
        Self {
            graph,
            dispatcher,
            tickets: Arc::new(StdMutex::new(TicketBook::default())),
            active_config: Arc::new(StdMutex::new(None)),
        }
    }

    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Configuration of the most recently executed LLM node
    pub fn active_config(&self) -> Option<ModelConfig> {
        self.active_config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of nodes with an execution whose result is still outstanding
    pub fn in_flight(&self) -> usize {
        self.book().latest.len()
    }

    /// Execute an LLM node.
    ///
    /// A request that fails local validation returns before a ticket is
    /// issued, so it never supersedes an execution already in flight.
    pub async fn execute(&self, node_id: &str) -> Result<ExecutionOutcome, ExecutionError> {
        let (config, request, ticket) = {
            let graph = self.graph.lock().await;
            let data = graph.get_node_data(node_id)?;
            let kind = data.kind();
            let NodeData::LLM(llm) = data else {
                return Err(GraphError::NotExecutable {
                    node: node_id.to_string(),
                    kind,
                }
                .into());
            };
            let incarnation = graph
                .incarnation(node_id)
                .ok_or_else(|| GraphError::UnknownNode(node_id.to_string()))?;

            let config = llm.to_model_config();
            let request = config.request(llm.prompt());
            self.dispatcher.check(&request)?;

            let ticket = Ticket {
                incarnation,
                sequence: self.book().issue(node_id),
            };
            (config, request, ticket)
        };

        self.record_active_config(&config);
        info!(node_id = %node_id, model = %config.model, "Executing node");

        let result = match self.dispatcher.generate(request).await {
            Ok(result) => result,
            Err(e) => {
                self.book().release(node_id, ticket.sequence);
                return Err(e.into());
            }
        };

        let mut graph = self.graph.lock().await;
        if graph.incarnation(node_id) != Some(ticket.incarnation) {
            self.book().release(node_id, ticket.sequence);
            warn!(node_id = %node_id, "Node removed during execution; discarding result");
            return Ok(ExecutionOutcome::Discarded {
                reason: DiscardReason::NodeRemoved,
            });
        }
        if !self.book().is_latest(node_id, ticket.sequence) {
            warn!(node_id = %node_id, "Newer execution in flight; discarding result");
            return Ok(ExecutionOutcome::Discarded {
                reason: DiscardReason::Superseded,
            });
        }
        self.book().release(node_id, ticket.sequence);

        let report =
            graph.update_node_data(node_id, NodeDataPatch::new().output(result.text.clone()))?;
        info!(
            node_id = %node_id,
            downstream = report.updated.len(),
            "Execution committed"
        );

        Ok(ExecutionOutcome::Committed {
            output: result.text,
            config,
            report,
        })
    }

    fn book(&self) -> std::sync::MutexGuard<'_, TicketBook> {
        self.tickets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_active_config(&self, config: &ModelConfig) {
        let mut active = self
            .active_config
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *active = Some(config.clone());
    }
}

impl std::fmt::Debug for NodeExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeExecutor")
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}
