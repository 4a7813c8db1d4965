use axum::{extract::State, Json};
use flowsmith_llm::GenerationRequest;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiJson, ApiResult},
    state::AppState,
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

fn required(value: Option<String>) -> ApiResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingParameters)
}

/// Generate text with one of the registered models
#[utoipa::path(
    post,
    path = "/api/llm/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Generated text", body = GenerateResponse),
        (status = 400, description = "Missing required parameters"),
        (status = 401, description = "Invalid API key"),
        (status = 500, description = "Provider or dispatch failure")
    ),
    tag = "llm"
)]
pub async fn generate(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> ApiResult<Json<GenerateResponse>> {
    let request = GenerationRequest {
        provider: required(req.model)?,
        prompt: required(req.prompt)?,
        credential: required(req.api_key)?,
        max_tokens: req.max_tokens,
        temperature: req.temperature,
    };

    tracing::debug!(model = %request.provider, "Generate request");
    let result = state.dispatcher.generate(request).await?;

    Ok(Json(GenerateResponse {
        response: result.text,
    }))
}

/// List model identifiers the dispatcher accepts
#[utoipa::path(
    get,
    path = "/api/llm/models",
    responses(
        (status = 200, description = "Registered model ids", body = ModelsResponse)
    ),
    tag = "llm"
)]
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.dispatcher.registry().ids(),
    })
}
