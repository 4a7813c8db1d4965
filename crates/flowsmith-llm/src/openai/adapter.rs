use super::{chat_completions, OPENAI_API_BASE};
use crate::error::GenerationError;
use crate::traits::{ProviderAdapter, ProviderKind};
use crate::types::{DeclaredRange, GenerationResult, ResolvedRequest, WireRequest, WireResponse};

/// OpenAI Chat Completions adapter for one model
#[derive(Debug, Clone)]
pub struct OpenAIAdapter {
    model: String,
    base_url: String,
    range: DeclaredRange,
}

impl OpenAIAdapter {
    pub fn new(model: impl Into<String>, range: DeclaredRange) -> Self {
        Self {
            model: model.into(),
            base_url: OPENAI_API_BASE.to_string(),
            range,
        }
    }

    /// `gpt-3.5-turbo`: 1..=2000 tokens (default 1000), temperature 0..=2
    pub fn gpt_35_turbo() -> Self {
        Self::new(
            "gpt-3.5-turbo",
            DeclaredRange::new((1, 2000), (0.0, 2.0)).with_defaults(1000, 0.7),
        )
    }

    /// `gpt-4`: 1..=4000 tokens (default 2000), temperature 0..=2
    pub fn gpt_4() -> Self {
        Self::new(
            "gpt-4",
            DeclaredRange::new((1, 4000), (0.0, 2.0)).with_defaults(2000, 0.7),
        )
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn declared_range(&self) -> DeclaredRange {
        self.range
    }

    fn build_request(&self, request: &ResolvedRequest) -> WireRequest {
        chat_completions::build_request(&self.base_url, &self.model, request)
    }

    fn parse_response(&self, response: &WireResponse) -> Result<GenerationResult, GenerationError> {
        chat_completions::parse_response("OpenAI", response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_tables() {
        let turbo = OpenAIAdapter::gpt_35_turbo();
        assert_eq!(turbo.declared_range().max_tokens_range, (1, 2000));
        assert_eq!(turbo.declared_range().default_max_tokens, 1000);

        let gpt4 = OpenAIAdapter::gpt_4();
        assert_eq!(gpt4.declared_range().max_tokens_range, (1, 4000));
        assert_eq!(gpt4.declared_range().default_max_tokens, 2000);
        assert_eq!(gpt4.declared_range().temperature_range, (0.0, 2.0));
    }

    #[test]
    fn test_build_request_uses_own_model_and_base_url() {
        let adapter = OpenAIAdapter::gpt_4().with_base_url("http://localhost:9999");
        let wire = adapter.build_request(&ResolvedRequest {
            prompt: "p".to_string(),
            credential: "k".to_string(),
            max_tokens: 10,
            temperature: 0.1,
        });
        assert_eq!(wire.url, "http://localhost:9999/chat/completions");
        assert_eq!(wire.body["model"], "gpt-4");
    }
}
