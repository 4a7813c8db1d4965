use axum::Json;
use utoipa::OpenApi;

use crate::routes::{chat, graph, health, llm};

#[derive(OpenApi)]
#[openapi(
    info(title = "Flowsmith API", description = "Node-graph LLM workflows and chat sessions"),
    paths(
        health::health_check,
        health::api_test,
        llm::generate,
        llm::list_models,
        graph::get_graph,
        graph::create_node,
        graph::delete_node,
        graph::get_node_data,
        graph::update_node_data,
        graph::execute_node,
        graph::create_edge,
        graph::delete_edge,
        graph::active_config,
        chat::create_session,
        chat::list_sessions,
        chat::get_session,
        chat::delete_session,
        chat::replace_messages,
        chat::activate_session,
        chat::send_message,
    ),
    components(schemas(
        health::HealthResponse,
        health::TestResponse,
        llm::GenerateRequest,
        llm::GenerateResponse,
        llm::ModelsResponse,
        graph::CreateNodeRequest,
        graph::EdgeRequest,
        graph::ExecuteResponse,
        graph::ActiveConfigResponse,
        chat::SessionListResponse,
        chat::DeleteSessionResponse,
        chat::ReplaceMessagesRequest,
        chat::SendMessageRequest,
    )),
    tags(
        (name = "health", description = "Liveness and connectivity probes"),
        (name = "llm", description = "Direct generation"),
        (name = "graph", description = "Workflow graph editing and execution"),
        (name = "chat", description = "Chat sessions")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
