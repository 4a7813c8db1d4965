// Configuration layer for building the dispatcher and its adapter registry

use crate::deepseek::DEEPSEEK_API_BASE;
use crate::gemini::GEMINI_API_BASE;
use crate::openai::OPENAI_API_BASE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URLs for each provider family
///
/// Defaults point at the public APIs; override them to route through a proxy
/// or at a mock server in tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEndpoints {
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_gemini_base_url")]
    pub gemini_base_url: String,
    #[serde(default = "default_deepseek_base_url")]
    pub deepseek_base_url: String,
}

fn default_openai_base_url() -> String {
    OPENAI_API_BASE.to_string()
}

fn default_gemini_base_url() -> String {
    GEMINI_API_BASE.to_string()
}

fn default_deepseek_base_url() -> String {
    DEEPSEEK_API_BASE.to_string()
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai_base_url: default_openai_base_url(),
            gemini_base_url: default_gemini_base_url(),
            deepseek_base_url: default_deepseek_base_url(),
        }
    }
}

impl ProviderEndpoints {
    /// Point every provider at the same base URL
    pub fn all(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            openai_base_url: base_url.clone(),
            gemini_base_url: base_url.clone(),
            deepseek_base_url: base_url,
        }
    }
}

/// Timeout and retry policy applied to every provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Extra attempts after a timeout or dropped connection; never used for HTTP errors
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl DispatchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
