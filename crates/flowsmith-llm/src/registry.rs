use crate::config::ProviderEndpoints;
use crate::deepseek::{DeepseekAdapter, DEEPSEEK_CHAT_MODEL};
use crate::gemini::GeminiAdapter;
use crate::openai::OpenAIAdapter;
use crate::traits::ProviderAdapter;
use std::collections::HashMap;
use std::sync::Arc;

/// Static mapping from provider id (model identifier) to adapter
///
/// Built once at startup. Lookups never fall back to a default provider:
/// an unknown id simply resolves to `None`.
#[derive(Clone, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in model:
    /// `gpt-3.5-turbo`, `gpt-4`, `gemini-pro`, `deepseek` (alias `deepseek-chat`)
    pub fn with_defaults(endpoints: &ProviderEndpoints) -> Self {
        let deepseek: Arc<dyn ProviderAdapter> =
            Arc::new(DeepseekAdapter::new().with_base_url(&endpoints.deepseek_base_url));

        Self::new()
            .with(
                "gpt-3.5-turbo",
                OpenAIAdapter::gpt_35_turbo().with_base_url(&endpoints.openai_base_url),
            )
            .with(
                "gpt-4",
                OpenAIAdapter::gpt_4().with_base_url(&endpoints.openai_base_url),
            )
            .with(
                "gemini-pro",
                GeminiAdapter::gemini_pro().with_base_url(&endpoints.gemini_base_url),
            )
            .with_shared("deepseek", Arc::clone(&deepseek))
            .with_shared(DEEPSEEK_CHAT_MODEL, deepseek)
    }

    /// Register an adapter, replacing any previous one under the same id
    pub fn register(&mut self, id: impl Into<String>, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(id.into(), adapter);
    }

    pub fn with(mut self, id: impl Into<String>, adapter: impl ProviderAdapter + 'static) -> Self {
        self.register(id, Arc::new(adapter));
        self
    }

    pub fn with_shared(mut self, id: impl Into<String>, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.register(id, adapter);
        self
    }

    pub fn resolve(&self, id: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.adapters.contains_key(id)
    }

    /// Registered ids, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.adapters.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}
