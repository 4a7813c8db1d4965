use flowsmith_graph::{Edge, GraphStore, Node, NodeData, NodeDataPatch, NodeKind};

fn llm_data(store: &GraphStore, id: &str) -> flowsmith_graph::LlmData {
    match store.get_node_data(id).unwrap() {
        NodeData::LLM(data) => data,
        other => panic!("expected llm data, got {:?}", other),
    }
}

fn output_value(store: &GraphStore, id: &str) -> String {
    match store.get_node_data(id).unwrap() {
        NodeData::Output(data) => data.value,
        other => panic!("expected output data, got {:?}", other),
    }
}

/// in -> llm -> out, plus in -> out2
fn pipeline() -> GraphStore {
    let mut store = GraphStore::new();
    store.add_node(Node::input("in")).unwrap();
    store.add_node(Node::llm("llm")).unwrap();
    store.add_node(Node::output("out")).unwrap();
    store.add_node(Node::output("out2")).unwrap();
    store.add_edge(Edge::new("in", "llm")).unwrap();
    store.add_edge(Edge::new("llm", "out")).unwrap();
    store.add_edge(Edge::new("in", "out2")).unwrap();
    store
}

#[test]
fn test_output_target_receives_value() {
    let mut store = pipeline();
    store
        .update_node_data("llm", NodeDataPatch::new().output("X"))
        .unwrap();
    assert_eq!(output_value(&store, "out"), "X");
}

#[test]
fn test_llm_target_receives_input_and_keeps_credentials() {
    let mut store = pipeline();
    store
        .update_node_data("llm", NodeDataPatch::new().api_key("sk-keep").model("gpt-4"))
        .unwrap();

    let report = store
        .update_node_data("in", NodeDataPatch::new().output("question"))
        .unwrap();
    assert_eq!(report.updated, vec!["llm".to_string(), "out2".to_string()]);

    let llm = llm_data(&store, "llm");
    assert_eq!(llm.input_value.as_deref(), Some("question"));
    assert_eq!(llm.api_key, "sk-keep");
    assert_eq!(llm.model, "gpt-4");
}

#[test]
fn test_input_value_write_propagates() {
    let mut store = pipeline();
    store
        .update_node_data("in", NodeDataPatch::new().value("typed"))
        .unwrap();
    assert_eq!(output_value(&store, "out2"), "typed");
    assert_eq!(llm_data(&store, "llm").input_value.as_deref(), Some("typed"));
}

#[test]
fn test_propagation_is_one_hop() {
    let mut store = pipeline();
    store
        .update_node_data("in", NodeDataPatch::new().output("q"))
        .unwrap();

    // The LLM node received input but produced nothing, so `out` is untouched
    assert_eq!(llm_data(&store, "llm").output, None);
    assert_eq!(output_value(&store, "out"), "");
}

#[test]
fn test_cycle_does_not_cascade() {
    let mut store = GraphStore::new();
    store.add_node(Node::llm("a")).unwrap();
    store.add_node(Node::llm("b")).unwrap();
    store.add_edge(Edge::new("a", "b")).unwrap();
    store.add_edge(Edge::new("b", "a")).unwrap();

    let report = store
        .update_node_data("a", NodeDataPatch::new().output("ping"))
        .unwrap();

    assert_eq!(report.updated, vec!["b".to_string()]);
    assert_eq!(llm_data(&store, "b").input_value.as_deref(), Some("ping"));
    assert_eq!(llm_data(&store, "b").output, None);
    assert_eq!(llm_data(&store, "a").input_value, None);
}

#[test]
fn test_last_write_wins_on_shared_target() {
    let mut store = GraphStore::new();
    store.add_node(Node::llm("first")).unwrap();
    store.add_node(Node::llm("second")).unwrap();
    store.add_node(Node::output("out")).unwrap();
    store.add_edge(Edge::new("first", "out")).unwrap();
    store.add_edge(Edge::new("second", "out")).unwrap();

    store
        .update_node_data("second", NodeDataPatch::new().output("from second"))
        .unwrap();
    store
        .update_node_data("first", NodeDataPatch::new().output("from first"))
        .unwrap();

    assert_eq!(output_value(&store, "out"), "from first");
}

#[test]
fn test_input_target_is_not_written() {
    let mut store = GraphStore::new();
    store.add_node(Node::llm("llm")).unwrap();
    store.add_node(Node::input("in")).unwrap();
    store.add_edge(Edge::new("llm", "in")).unwrap();

    let report = store
        .update_node_data("llm", NodeDataPatch::new().output("X"))
        .unwrap();

    assert!(report.updated.is_empty());
    assert_eq!(store.get_node_data("in").unwrap(), NodeData::for_kind(NodeKind::Input));
}

#[test]
fn test_empty_patch_is_idempotent() {
    let mut store = pipeline();
    store
        .update_node_data("llm", NodeDataPatch::new().output("X").api_key("k"))
        .unwrap();
    let before = store.snapshot();

    let report = store.update_node_data("llm", NodeDataPatch::new()).unwrap();

    assert!(report.updated.is_empty());
    assert_eq!(store.snapshot(), before);
}

#[test]
fn test_empty_output_committed_but_not_propagated() {
    let mut store = pipeline();
    store
        .update_node_data("llm", NodeDataPatch::new().output("X"))
        .unwrap();
    let report = store
        .update_node_data("llm", NodeDataPatch::new().output(""))
        .unwrap();

    assert!(report.updated.is_empty());
    assert_eq!(llm_data(&store, "llm").output.as_deref(), Some(""));
    assert_eq!(output_value(&store, "out"), "X");
}

#[test]
fn test_remove_node_cascades() {
    let mut store = pipeline();
    store.remove_node("llm").unwrap();

    assert!(store
        .list_edges()
        .iter()
        .all(|edge| edge.source != "llm" && edge.target != "llm"));
    assert_eq!(store.list_edges(), vec![Edge::new("in", "out2")]);
    assert!(store.get_node_data("llm").is_err());
    assert!(store.get_node("llm").is_err());
}

#[test]
fn test_reads_are_snapshots() {
    let mut store = pipeline();
    let mut edges = store.list_edges();
    edges.clear();
    let mut data = store.get_node_data("out").unwrap();
    if let NodeData::Output(ref mut output) = data {
        output.value = "tampered".into();
    }

    assert_eq!(store.list_edges().len(), 3);
    assert_eq!(output_value(&store, "out"), "");
    store
        .update_node_data("out", NodeDataPatch::new().value("direct"))
        .unwrap();
    assert_eq!(output_value(&store, "out"), "direct");
}
