use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use flowsmith_llm::ModelConfig;
use flowsmith_persist::{ChatMessage, ChatSession, ChatTurn};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionListResponse {
    #[schema(value_type = Vec<Object>)]
    pub sessions: Vec<ChatSession>,
    pub active_session_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSessionResponse {
    pub active_session_id: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceMessagesRequest {
    #[schema(value_type = Vec<Object>)]
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    pub text: String,
    /// Falls back to the most recently executed LLM node's settings
    #[serde(default)]
    #[schema(value_type = Object)]
    pub config: Option<ModelConfig>,
}

#[utoipa::path(
    post,
    path = "/api/chat/sessions",
    responses((status = 201, description = "Session created and made active")),
    tag = "chat"
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
) -> ApiResult<(StatusCode, Json<ChatSession>)> {
    let session = state.sessions().create().await?;
    Ok((StatusCode::CREATED, Json(session)))
}

#[utoipa::path(
    get,
    path = "/api/chat/sessions",
    responses((status = 200, description = "Sessions in creation order", body = SessionListResponse)),
    tag = "chat"
)]
pub async fn list_sessions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<SessionListResponse>> {
    let sessions = state.sessions().list().await?;
    let active_session_id = state.sessions().active().await?;
    Ok(Json(SessionListResponse {
        sessions,
        active_session_id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/chat/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session"),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<ChatSession>> {
    Ok(Json(state.sessions().get(&session_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/chat/sessions/{session_id}",
    params(("session_id" = String, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session deleted", body = DeleteSessionResponse),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<DeleteSessionResponse>> {
    let active_session_id = state.sessions().delete(&session_id).await?;
    Ok(Json(DeleteSessionResponse { active_session_id }))
}

/// Replace a session's messages and recompute its title
#[utoipa::path(
    put,
    path = "/api/chat/sessions/{session_id}/messages",
    params(("session_id" = String, Path, description = "Session ID")),
    request_body = ReplaceMessagesRequest,
    responses(
        (status = 200, description = "Updated session"),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn replace_messages(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(req): ApiJson<ReplaceMessagesRequest>,
) -> ApiResult<Json<ChatSession>> {
    let session = state
        .sessions()
        .append_and_retitle(&session_id, req.messages)
        .await?;
    Ok(Json(session))
}

#[utoipa::path(
    post,
    path = "/api/chat/sessions/{session_id}/activate",
    params(("session_id" = String, Path, description = "Session ID")),
    responses(
        (status = 204, description = "Session is now active"),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn activate_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.sessions().set_active(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Send a user message and append the model's reply
#[utoipa::path(
    post,
    path = "/api/chat/sessions/{session_id}/send",
    params(("session_id" = String, Path, description = "Session ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Chat turn; failed generations appear as an `Error: ...` reply"),
        (status = 400, description = "Empty message or no LLM configuration available"),
        (status = 404, description = "Session not found")
    ),
    tag = "chat"
)]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    ApiJson(req): ApiJson<SendMessageRequest>,
) -> ApiResult<Json<ChatTurn>> {
    let config = req
        .config
        .or_else(|| state.executor.active_config())
        .ok_or_else(|| {
            ApiError::BadRequest("no LLM configuration; execute an LLM node first".to_string())
        })?;

    let turn = state
        .chat
        .send_message(&session_id, &req.text, &config)
        .await?;
    Ok(Json(turn))
}
