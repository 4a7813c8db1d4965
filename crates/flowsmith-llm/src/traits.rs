use crate::error::{GenerationError, GenerationErrorKind};
use crate::types::{DeclaredRange, GenerationResult, ResolvedRequest, WireRequest, WireResponse};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of upstream API an adapter speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAI,
    Gemini,
    Deepseek,
    /// Adapters registered outside this crate (tests, proxies)
    Custom,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderKind::OpenAI => "OpenAI",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Deepseek => "Deepseek",
            ProviderKind::Custom => "Custom",
        };
        f.write_str(name)
    }
}

/// Translation layer between the generic generation contract and one
/// provider's wire format.
///
/// Adapters are pure: they never perform I/O. The [`crate::Dispatcher`]
/// owns the network call and feeds the raw outcome back through
/// [`ProviderAdapter::parse_response`] or [`ProviderAdapter::classify_error`].
pub trait ProviderAdapter: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Parameter bounds used to clamp caller-supplied values before dispatch
    fn declared_range(&self) -> DeclaredRange;

    /// Build the provider HTTP request from already-clamped parameters
    fn build_request(&self, request: &ResolvedRequest) -> WireRequest;

    /// Extract generated text from a 2xx response
    fn parse_response(&self, response: &WireResponse) -> Result<GenerationResult, GenerationError>;

    /// Map a non-2xx status (and body) onto the normalized taxonomy
    fn classify_error(&self, status: u16, _body: &str) -> GenerationErrorKind {
        classify_status(status)
    }

    /// Provider's own human-readable explanation, if the body carries one
    fn error_detail(&self, body: &str) -> Option<String> {
        extract_error_message(body)
    }
}

/// Status-code classification shared by all providers
pub fn classify_status(status: u16) -> GenerationErrorKind {
    match status {
        401 => GenerationErrorKind::AuthError,
        429 => GenerationErrorKind::RateLimited,
        500..=599 => GenerationErrorKind::ProviderUnavailable,
        400..=499 => GenerationErrorKind::BadRequest,
        _ => GenerationErrorKind::ProviderUnavailable,
    }
}

/// Pull `error.message` (or a bare `error` string) out of an error body,
/// falling back to the trimmed raw body.
pub fn extract_error_message(body: &str) -> Option<String> {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let error = &value["error"];
        if let Some(message) = error["message"].as_str() {
            return Some(message.to_string());
        }
        if let Some(message) = error.as_str() {
            return Some(message.to_string());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
