use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Provider-agnostic generation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model identifier the registry resolves to an adapter (e.g. "gpt-4")
    pub provider: String,
    pub prompt: String,
    /// API key, forwarded to the provider and never persisted
    pub credential: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(
        provider: impl Into<String>,
        prompt: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            prompt: prompt.into(),
            credential: credential.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }
}

/// Reusable model settings: everything in a request except the prompt.
///
/// This is what an LLM node carries and what a chat session borrows from
/// the most recently executed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub model: String,
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ModelConfig {
    pub fn new(model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn request(&self, prompt: impl Into<String>) -> GenerationRequest {
        GenerationRequest {
            provider: self.model.clone(),
            prompt: prompt.into(),
            credential: self.api_key.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Successful generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub text: String,
}

impl GenerationResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Parameter bounds and defaults a provider accepts for one model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeclaredRange {
    pub max_tokens_range: (u32, u32),
    pub temperature_range: (f32, f32),
    pub default_max_tokens: u32,
    pub default_temperature: f32,
}

impl DeclaredRange {
    pub fn new(max_tokens_range: (u32, u32), temperature_range: (f32, f32)) -> Self {
        Self {
            max_tokens_range,
            temperature_range,
            default_max_tokens: max_tokens_range.1.min(1000).max(max_tokens_range.0),
            default_temperature: 0.7_f32.clamp(temperature_range.0, temperature_range.1),
        }
    }

    pub fn with_defaults(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.default_max_tokens = max_tokens;
        self.default_temperature = temperature;
        self
    }

    /// Clamp a caller-supplied token budget, falling back to the model default
    pub fn clamp_max_tokens(&self, requested: Option<u32>) -> u32 {
        let (lo, hi) = self.max_tokens_range;
        requested.unwrap_or(self.default_max_tokens).clamp(lo, hi)
    }

    /// Clamp a caller-supplied temperature; non-finite values count as absent
    pub fn clamp_temperature(&self, requested: Option<f32>) -> f32 {
        let (lo, hi) = self.temperature_range;
        requested
            .filter(|t| t.is_finite())
            .unwrap_or(self.default_temperature)
            .clamp(lo, hi)
    }
}

/// Generation parameters after validation and clamping, ready for an adapter
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRequest {
    pub prompt: String,
    pub credential: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// HTTP call an adapter wants issued. Opaque to dispatcher callers.
#[derive(Debug, Clone, PartialEq)]
pub struct WireRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl WireRequest {
    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            body,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Raw HTTP outcome handed back to an adapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_max_tokens_upper_bound() {
        let range = DeclaredRange::new((1, 2000), (0.0, 2.0));
        assert_eq!(range.clamp_max_tokens(Some(999_999)), 2000);
        assert_eq!(range.clamp_max_tokens(Some(0)), 1);
        assert_eq!(range.clamp_max_tokens(Some(512)), 512);
    }

    #[test]
    fn test_clamp_uses_defaults_when_absent() {
        let range = DeclaredRange::new((1, 4000), (0.0, 2.0)).with_defaults(2000, 0.7);
        assert_eq!(range.clamp_max_tokens(None), 2000);
        assert!((range.clamp_temperature(None) - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamp_temperature() {
        let range = DeclaredRange::new((1, 2048), (0.0, 1.0));
        assert_eq!(range.clamp_temperature(Some(1.7)), 1.0);
        assert_eq!(range.clamp_temperature(Some(-3.0)), 0.0);
        assert!((range.clamp_temperature(Some(f32::NAN)) - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_model_config_request() {
        let mut config = ModelConfig::new("gemini-pro", "key");
        config.max_tokens = Some(64);
        let request = config.request("hi");
        assert_eq!(request.provider, "gemini-pro");
        assert_eq!(request.credential, "key");
        assert_eq!(request.max_tokens, Some(64));
        assert_eq!(request.temperature, None);
    }

    #[test]
    fn test_wire_response_success() {
        assert!(WireResponse::new(200, "{}").is_success());
        assert!(!WireResponse::new(429, "").is_success());
    }
}
