// Deepseek speaks the OpenAI Chat Completions dialect under its own base URL

use super::{DEEPSEEK_API_BASE, DEEPSEEK_CHAT_MODEL};
use crate::error::GenerationError;
use crate::openai::chat_completions;
use crate::traits::{ProviderAdapter, ProviderKind};
use crate::types::{DeclaredRange, GenerationResult, ResolvedRequest, WireRequest, WireResponse};

#[derive(Debug, Clone)]
pub struct DeepseekAdapter {
    base_url: String,
    range: DeclaredRange,
}

impl DeepseekAdapter {
    /// 1..=2000 tokens (default 1000), temperature 0..=1
    pub fn new() -> Self {
        Self {
            base_url: DEEPSEEK_API_BASE.to_string(),
            range: DeclaredRange::new((1, 2000), (0.0, 1.0)).with_defaults(1000, 0.7),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for DeepseekAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProviderAdapter for DeepseekAdapter {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Deepseek
    }

    fn declared_range(&self) -> DeclaredRange {
        self.range
    }

    fn build_request(&self, request: &ResolvedRequest) -> WireRequest {
        chat_completions::build_request(&self.base_url, DEEPSEEK_CHAT_MODEL, request)
    }

    fn parse_response(&self, response: &WireResponse) -> Result<GenerationResult, GenerationError> {
        chat_completions::parse_response("Deepseek", response)
    }
}
