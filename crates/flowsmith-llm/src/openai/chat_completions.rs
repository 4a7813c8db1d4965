// Chat Completions wire format, shared by OpenAI and OpenAI-compatible providers

use crate::error::GenerationError;
use crate::types::{GenerationResult, ResolvedRequest, WireRequest, WireResponse};
use serde::{Deserialize, Serialize};

/// Build a single-turn `POST {base_url}/chat/completions` request
pub(crate) fn build_request(base_url: &str, model: &str, request: &ResolvedRequest) -> WireRequest {
    let body = serde_json::json!({
        "model": model,
        "messages": [
            { "role": "user", "content": request.prompt }
        ],
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
    });

    WireRequest::post(
        format!("{}/chat/completions", base_url.trim_end_matches('/')),
        body,
    )
    .header("Authorization", format!("Bearer {}", request.credential))
}

/// Read `choices[0].message.content`
pub(crate) fn parse_response(
    provider: &str,
    response: &WireResponse,
) -> Result<GenerationResult, GenerationError> {
    let raw: ChatCompletionResponse = serde_json::from_str(&response.body).map_err(|e| {
        GenerationError::invalid_response_shape(format!(
            "{} returned a malformed chat completion",
            provider
        ))
        .with_detail(e.to_string())
    })?;

    raw.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(GenerationResult::new)
        .ok_or_else(|| {
            GenerationError::invalid_response_shape(format!(
                "{} response has no choices[0].message.content",
                provider
            ))
        })
}

// ============================================================================
// RESPONSE TYPES (only the fields we read)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    pub message: ResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}
