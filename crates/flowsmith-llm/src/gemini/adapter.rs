// Gemini generateContent adapter

use super::GEMINI_API_BASE;
use crate::error::{GenerationError, GenerationErrorKind};
use crate::traits::{classify_status, ProviderAdapter, ProviderKind};
use crate::types::{DeclaredRange, GenerationResult, ResolvedRequest, WireRequest, WireResponse};
use serde::{Deserialize, Serialize};

/// Gemini differs from the Chat Completions family in three ways:
/// - URL: {base}/models/{model}:generateContent
/// - Auth header: x-goog-api-key instead of Authorization: Bearer
/// - Body: contents/parts with a generationConfig block
#[derive(Debug, Clone)]
pub struct GeminiAdapter {
    model: String,
    base_url: String,
    range: DeclaredRange,
}

impl GeminiAdapter {
    pub fn new(model: impl Into<String>, range: DeclaredRange) -> Self {
        Self {
            model: model.into(),
            base_url: GEMINI_API_BASE.to_string(),
            range,
        }
    }

    /// `gemini-pro`: 1..=2048 tokens (default 1000), temperature 0..=1
    pub fn gemini_pro() -> Self {
        Self::new(
            "gemini-pro",
            DeclaredRange::new((1, 2048), (0.0, 1.0)).with_defaults(1000, 0.7),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Gemini
    }

    fn declared_range(&self) -> DeclaredRange {
        self.range
    }

    fn build_request(&self, request: &ResolvedRequest) -> WireRequest {
        let body = serde_json::json!({
            "contents": [
                { "role": "user", "parts": [ { "text": request.prompt } ] }
            ],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_tokens,
            },
        });

        WireRequest::post(
            format!(
                "{}/models/{}:generateContent",
                self.base_url.trim_end_matches('/'),
                self.model
            ),
            body,
        )
        .header("x-goog-api-key", request.credential.clone())
    }

    fn parse_response(&self, response: &WireResponse) -> Result<GenerationResult, GenerationError> {
        let raw: GenerateContentResponse = serde_json::from_str(&response.body).map_err(|e| {
            GenerationError::invalid_response_shape("Gemini returned a malformed response")
                .with_detail(e.to_string())
        })?;

        raw.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
            .map(GenerationResult::new)
            .ok_or_else(|| {
                GenerationError::invalid_response_shape(
                    "Gemini response has no candidates[0].content.parts[0].text",
                )
            })
    }

    /// Gemini reports a bad key as 400 API_KEY_INVALID or 403 PERMISSION_DENIED
    fn classify_error(&self, status: u16, body: &str) -> GenerationErrorKind {
        match status {
            403 => GenerationErrorKind::AuthError,
            400 if body.contains("API_KEY_INVALID") || body.contains("API key not valid") => {
                GenerationErrorKind::AuthError
            }
            _ => classify_status(status),
        }
    }
}

// ============================================================================
// RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default, rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    pub text: Option<String>,
}
