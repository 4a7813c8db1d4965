use config::{Config as ConfigLoader, ConfigError, Environment, File, FileFormat};
use flowsmith_llm::{DispatchConfig, ProviderEndpoints};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Server configuration. API keys are never part of it: they arrive per request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub providers: ProviderEndpoints,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Raised at runtime to cover the dispatcher's worst case, see [`Config::request_timeout`]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3002,
            request_timeout_secs: 90,
        }
    }
}

/// Headroom kept between the last dispatch attempt and the HTTP request timeout
const DISPATCH_SLACK_SECS: u64 = 5;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://localhost:3002".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables: `FLOWSMITH_<SECTION>__<KEY>`,
    ///    e.g. `FLOWSMITH_DISPATCH__TIMEOUT_SECS=10`
    /// 4. `PORT`, for hosts that assign the listening port
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // 3. Environment variables override everything
            .add_source(
                Environment::with_prefix("FLOWSMITH")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors.origins")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        ConfigLoader::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// HTTP request timeout, never shorter than every dispatch attempt plus slack,
    /// so a hung provider surfaces as a normalized timeout error rather than a 408
    pub fn request_timeout(&self) -> Duration {
        let attempts = u64::from(self.dispatch.max_retries) + 1;
        let floor = self
            .dispatch
            .timeout_secs
            .saturating_mul(attempts)
            .saturating_add(DISPATCH_SLACK_SECS);
        Duration::from_secs(self.server.request_timeout_secs.max(floor))
    }
}
