use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use flowsmith_graph::{
    DiscardReason, Edge, ExecutionOutcome, GraphSnapshot, Node, NodeData, NodeDataPatch,
    NodeEntry, NodeKind, PropagationReport,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNodeRequest {
    /// Generated as `{kind}-{uuid}` when absent
    #[serde(default)]
    pub id: Option<String>,
    #[schema(value_type = String, example = "llm")]
    pub kind: NodeKind,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EdgeRequest {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteResponse {
    /// `committed` or `discarded`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub updated: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<ExecutionOutcome> for ExecuteResponse {
    fn from(outcome: ExecutionOutcome) -> Self {
        match outcome {
            ExecutionOutcome::Committed { output, report, .. } => Self {
                status: "committed".to_string(),
                output: Some(output),
                updated: report.updated,
                reason: None,
            },
            ExecutionOutcome::Discarded { reason } => Self {
                status: "discarded".to_string(),
                output: None,
                updated: Vec::new(),
                reason: Some(
                    match reason {
                        DiscardReason::NodeRemoved => "node_removed",
                        DiscardReason::Superseded => "superseded",
                    }
                    .to_string(),
                ),
            },
        }
    }
}

/// Settings of the most recently executed LLM node, without its key
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActiveConfigResponse {
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Whole graph: nodes with their data, and edges
#[utoipa::path(
    get,
    path = "/api/graph",
    responses((status = 200, description = "Graph snapshot")),
    tag = "graph"
)]
pub async fn get_graph(State(state): State<Arc<AppState>>) -> Json<GraphSnapshot> {
    Json(state.graph().lock().await.snapshot())
}

#[utoipa::path(
    post,
    path = "/api/graph/nodes",
    request_body = CreateNodeRequest,
    responses(
        (status = 201, description = "Node created with default data"),
        (status = 400, description = "Duplicate node id")
    ),
    tag = "graph"
)]
pub async fn create_node(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateNodeRequest>,
) -> ApiResult<(StatusCode, Json<NodeEntry>)> {
    let node = match req.id {
        Some(id) if !id.is_empty() => Node::new(id, req.kind),
        _ => Node::generated(req.kind),
    };

    let mut graph = state.graph().lock().await;
    graph.add_node(node.clone())?;
    let data = graph.get_node_data(&node.id)?;

    Ok((
        StatusCode::CREATED,
        Json(NodeEntry {
            id: node.id,
            kind: node.kind,
            data,
        }),
    ))
}

/// Delete a node together with its edges and data
#[utoipa::path(
    delete,
    path = "/api/graph/nodes/{node_id}",
    params(("node_id" = String, Path, description = "Node ID")),
    responses(
        (status = 204, description = "Node removed"),
        (status = 400, description = "Unknown node")
    ),
    tag = "graph"
)]
pub async fn delete_node(
    State(state): State<Arc<AppState>>,
    Path(node_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.graph().lock().await.remove_node(&node_id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/graph/nodes/{node_id}/data",
    params(("node_id" = String, Path, description = "Node ID")),
    responses(
        (status = 200, description = "Node data"),
        (status = 400, description = "Unknown node")
    ),
    tag = "graph"
)]
pub async fn get_node_data(
    State(state): State<Arc<AppState>>,
    Path(node_id): Path<String>,
) -> ApiResult<Json<NodeData>> {
    Ok(Json(state.graph().lock().await.get_node_data(&node_id)?))
}

/// Merge a partial update into a node and propagate any produced output
#[utoipa::path(
    patch,
    path = "/api/graph/nodes/{node_id}/data",
    params(("node_id" = String, Path, description = "Node ID")),
    responses(
        (status = 200, description = "Nodes updated by propagation"),
        (status = 400, description = "Unknown node or field not valid for the node kind")
    ),
    tag = "graph"
)]
pub async fn update_node_data(
    State(state): State<Arc<AppState>>,
    Path(node_id): Path<String>,
    ApiJson(patch): ApiJson<NodeDataPatch>,
) -> ApiResult<Json<PropagationReport>> {
    let report = state
        .graph()
        .lock()
        .await
        .update_node_data(&node_id, patch)?;
    Ok(Json(report))
}

/// Run an LLM node and commit its output
#[utoipa::path(
    post,
    path = "/api/graph/nodes/{node_id}/execute",
    params(("node_id" = String, Path, description = "LLM node ID")),
    responses(
        (status = 200, description = "Execution committed or discarded", body = ExecuteResponse),
        (status = 400, description = "Unknown or non-LLM node, or missing input"),
        (status = 401, description = "Invalid API key"),
        (status = 500, description = "Provider or dispatch failure")
    ),
    tag = "graph"
)]
pub async fn execute_node(
    State(state): State<Arc<AppState>>,
    Path(node_id): Path<String>,
) -> ApiResult<Json<ExecuteResponse>> {
    let outcome = state.executor.execute(&node_id).await?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    post,
    path = "/api/graph/edges",
    request_body = EdgeRequest,
    responses(
        (status = 201, description = "Edge created"),
        (status = 400, description = "Unknown endpoint or duplicate edge")
    ),
    tag = "graph"
)]
pub async fn create_edge(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<EdgeRequest>,
) -> ApiResult<(StatusCode, Json<Edge>)> {
    let edge = Edge::new(req.source, req.target);
    state.graph().lock().await.add_edge(edge.clone())?;
    Ok((StatusCode::CREATED, Json(edge)))
}

#[utoipa::path(
    delete,
    path = "/api/graph/edges/{source}/{target}",
    params(
        ("source" = String, Path, description = "Source node ID"),
        ("target" = String, Path, description = "Target node ID")
    ),
    responses(
        (status = 204, description = "Edge removed"),
        (status = 404, description = "No such edge")
    ),
    tag = "graph"
)]
pub async fn delete_edge(
    State(state): State<Arc<AppState>>,
    Path((source, target)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    if state.graph().lock().await.remove_edge(&source, &target) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!(
            "Edge not found: {} -> {}",
            source, target
        )))
    }
}

#[utoipa::path(
    get,
    path = "/api/graph/active-config",
    responses((status = 200, description = "Active LLM configuration", body = ActiveConfigResponse)),
    tag = "graph"
)]
pub async fn active_config(State(state): State<Arc<AppState>>) -> Json<ActiveConfigResponse> {
    let response = match state.executor.active_config() {
        Some(config) => ActiveConfigResponse {
            active: true,
            model: Some(config.model),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        },
        None => ActiveConfigResponse {
            active: false,
            model: None,
            max_tokens: None,
            temperature: None,
        },
    };
    Json(response)
}
