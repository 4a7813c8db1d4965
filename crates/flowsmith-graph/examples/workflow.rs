use anyhow::Result;
use flowsmith_graph::{Edge, ExecutionOutcome, GraphStore, Node, NodeDataPatch, NodeExecutor};
use flowsmith_llm::{DispatchConfig, Dispatcher, ProviderEndpoints};
use std::sync::Arc;
use tokio::sync::Mutex;

#[tokio::main]
async fn main() -> Result<()> {
    let model = std::env::var("MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
    let api_key = std::env::var("API_KEY")?;

    let mut store = GraphStore::new();
    store.add_node(Node::input("prompt"))?;
    store.add_node(Node::llm("writer"))?;
    store.add_node(Node::output("result"))?;
    store.add_edge(Edge::new("prompt", "writer"))?;
    store.add_edge(Edge::new("writer", "result"))?;

    store.update_node_data("writer", NodeDataPatch::new().model(model).api_key(api_key))?;
    store.update_node_data(
        "prompt",
        NodeDataPatch::new().value("Write a haiku about borrow checking."),
    )?;

    let dispatcher = Dispatcher::from_config(&ProviderEndpoints::default(), DispatchConfig::default())?;
    let executor = NodeExecutor::new(Arc::new(Mutex::new(store)), dispatcher);

    match executor.execute("writer").await {
        Ok(ExecutionOutcome::Committed { output, report, .. }) => {
            println!("{}", output);
            println!("Propagated to: {:?}", report.updated);
        }
        Ok(ExecutionOutcome::Discarded { reason }) => println!("Discarded: {:?}", reason),
        Err(e) => println!("Execution failed: {}", e),
    }

    let snapshot = executor.graph().lock().await.snapshot();
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    Ok(())
}
