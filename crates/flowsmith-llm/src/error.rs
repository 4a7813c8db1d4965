use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Normalized failure categories shared by every provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationErrorKind {
    /// `provider`, `prompt` or `credential` was empty
    MissingParameter,
    /// No adapter registered for the requested provider id
    UnsupportedModel,
    /// Provider rejected the credential (HTTP 401)
    AuthError,
    /// Provider throttled the call (HTTP 429)
    RateLimited,
    /// Provider-side failure (HTTP 5xx) or an unclassifiable transport error
    ProviderUnavailable,
    /// Any other 4xx
    BadRequest,
    /// 2xx response without the fields the adapter expects
    InvalidResponseShape,
    /// Timeout or connection reset, after retries were exhausted
    NetworkTimeout,
}

impl GenerationErrorKind {
    /// Whether the failure came back from (or on the way to) a provider,
    /// as opposed to being rejected locally before dispatch.
    pub fn is_provider_error(&self) -> bool {
        !matches!(self, Self::MissingParameter | Self::UnsupportedModel)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingParameter => "missing_parameter",
            Self::UnsupportedModel => "unsupported_model",
            Self::AuthError => "auth_error",
            Self::RateLimited => "rate_limited",
            Self::ProviderUnavailable => "provider_unavailable",
            Self::BadRequest => "bad_request",
            Self::InvalidResponseShape => "invalid_response_shape",
            Self::NetworkTimeout => "network_timeout",
        }
    }
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by [`crate::Dispatcher::generate`].
///
/// Provider-specific failures never cross the dispatcher boundary in any
/// other shape: whatever went wrong is folded into a `kind`, a
/// human-readable `message`, and optionally the provider's own wording.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_detail: Option<String>,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            provider_detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.provider_detail = Some(detail.into());
        self
    }

    pub fn missing_parameter(name: &str) -> Self {
        Self::new(
            GenerationErrorKind::MissingParameter,
            format!("Missing required parameter: {}", name),
        )
    }

    pub fn unsupported_model(provider: &str) -> Self {
        Self::new(
            GenerationErrorKind::UnsupportedModel,
            format!("Unsupported model: {}", provider),
        )
    }

    pub fn invalid_response_shape(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::InvalidResponseShape, message)
    }
}
