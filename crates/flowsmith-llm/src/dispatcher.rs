use crate::config::{DispatchConfig, ProviderEndpoints};
use crate::error::{GenerationError, GenerationErrorKind};
use crate::registry::AdapterRegistry;
use crate::traits::ProviderAdapter;
use crate::transport::{HttpTransport, Transport, TransportError};
use crate::types::{GenerationRequest, GenerationResult, ResolvedRequest, WireRequest, WireResponse};
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;

/// Selects an adapter, executes the call and normalizes the outcome.
///
/// Holds no per-call state: cloning is cheap and every `generate` call is
/// independent, so one instance can be shared across tasks.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<AdapterRegistry>,
    transport: Arc<dyn Transport>,
    config: DispatchConfig,
}

impl Dispatcher {
    pub fn new(registry: AdapterRegistry, transport: Arc<dyn Transport>) -> Self {
        Self {
            registry: Arc::new(registry),
            transport,
            config: DispatchConfig::default(),
        }
    }

    /// Built-in registry over the real HTTP transport
    pub fn from_config(endpoints: &ProviderEndpoints, config: DispatchConfig) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new()?);
        Ok(Self::new(AdapterRegistry::with_defaults(endpoints), transport).with_config(config))
    }

    pub fn with_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// The local checks `generate` runs before any network call:
    /// required fields, then adapter lookup.
    pub fn check(&self, request: &GenerationRequest) -> std::result::Result<(), GenerationError> {
        validate(request)?;
        self.registry
            .resolve(&request.provider)
            .map(|_| ())
            .ok_or_else(|| GenerationError::unsupported_model(&request.provider))
    }

    /// Run one generation.
    ///
    /// Order of checks: required fields, adapter lookup, parameter clamping,
    /// then the network call. Nothing is sent unless the first two pass.
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<GenerationResult, GenerationError> {
        validate(&request)?;

        let adapter = self
            .registry
            .resolve(&request.provider)
            .ok_or_else(|| GenerationError::unsupported_model(&request.provider))?;

        let resolved = resolve_parameters(adapter.as_ref(), request.clone());

        tracing::debug!(
            provider = %request.provider,
            kind = %adapter.kind(),
            max_tokens = resolved.max_tokens,
            temperature = resolved.temperature,
            "Dispatching generation request"
        );

        let wire = adapter.build_request(&resolved);
        let start = Instant::now();
        let response = self.send_with_retry(&request.provider, &wire).await?;

        tracing::debug!(
            provider = %request.provider,
            status = response.status,
            duration_ms = %start.elapsed().as_millis(),
            "Provider responded"
        );

        if response.is_success() {
            adapter.parse_response(&response).map_err(|e| {
                tracing::error!(provider = %request.provider, error = %e, "Unexpected response shape");
                e
            })
        } else {
            let err = normalize_http_error(adapter.as_ref(), &response);
            tracing::error!(
                provider = %request.provider,
                status = response.status,
                kind = %err.kind,
                "Provider returned an error"
            );
            Err(err)
        }
    }

    async fn send_with_retry(
        &self,
        provider: &str,
        wire: &WireRequest,
    ) -> std::result::Result<WireResponse, GenerationError> {
        let mut attempt = 0;

        loop {
            match self.transport.send(wire, self.config.timeout()).await {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        provider = %provider,
                        attempt,
                        error = %e,
                        "Transient transport failure, retrying"
                    );
                }
                Err(e) => return Err(normalize_transport_error(provider, e)),
            }
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish()
    }
}

fn validate(request: &GenerationRequest) -> std::result::Result<(), GenerationError> {
    if request.provider.is_empty() {
        return Err(GenerationError::missing_parameter("provider"));
    }
    if request.prompt.is_empty() {
        return Err(GenerationError::missing_parameter("prompt"));
    }
    if request.credential.is_empty() {
        return Err(GenerationError::missing_parameter("credential"));
    }
    Ok(())
}

/// Clamp (never reject) caller parameters into the adapter's declared range
fn resolve_parameters(adapter: &dyn ProviderAdapter, request: GenerationRequest) -> ResolvedRequest {
    let range = adapter.declared_range();
    ResolvedRequest {
        max_tokens: range.clamp_max_tokens(request.max_tokens),
        temperature: range.clamp_temperature(request.temperature),
        prompt: request.prompt,
        credential: request.credential,
    }
}

fn normalize_http_error(adapter: &dyn ProviderAdapter, response: &WireResponse) -> GenerationError {
    let kind = adapter.classify_error(response.status, &response.body);
    let message = match kind {
        GenerationErrorKind::AuthError => "Invalid API key".to_string(),
        GenerationErrorKind::RateLimited => {
            format!("{} rate limit exceeded", adapter.kind())
        }
        GenerationErrorKind::BadRequest => {
            format!("{} rejected the request (HTTP {})", adapter.kind(), response.status)
        }
        _ => format!("{} is unavailable (HTTP {})", adapter.kind(), response.status),
    };

    let err = GenerationError::new(kind, message);
    match adapter.error_detail(&response.body) {
        Some(detail) => err.with_detail(detail),
        None => err,
    }
}

fn normalize_transport_error(provider: &str, err: TransportError) -> GenerationError {
    let kind = match err {
        TransportError::Timeout(_) | TransportError::Connection(_) => {
            GenerationErrorKind::NetworkTimeout
        }
        TransportError::InvalidRequest(_) => GenerationErrorKind::BadRequest,
        TransportError::Other(_) => GenerationErrorKind::ProviderUnavailable,
    };

    tracing::error!(provider = %provider, error = %err, kind = %kind, "Transport failure");
    GenerationError::new(kind, format!("Request to {} failed", provider)).with_detail(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::OpenAIAdapter;

    #[test]
    fn test_validate_order() {
        let err = validate(&GenerationRequest::new("", "", "")).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::MissingParameter);
        assert!(err.message.contains("provider"));

        let err = validate(&GenerationRequest::new("gpt-4", "p", "")).unwrap_err();
        assert!(err.message.contains("credential"));
    }

    #[test]
    fn test_resolve_parameters_clamps() {
        let adapter = OpenAIAdapter::gpt_35_turbo();
        let resolved = resolve_parameters(
            &adapter,
            GenerationRequest::new("gpt-3.5-turbo", "p", "k")
                .max_tokens(999_999)
                .temperature(5.0),
        );
        assert_eq!(resolved.max_tokens, 2000);
        assert_eq!(resolved.temperature, 2.0);
    }

    #[test]
    fn test_normalize_auth_error() {
        let adapter = OpenAIAdapter::gpt_4();
        let response = WireResponse::new(
            401,
            r#"{"error":{"message":"Incorrect API key provided: sk-***"}}"#,
        );
        let err = normalize_http_error(&adapter, &response);
        assert_eq!(err.kind, GenerationErrorKind::AuthError);
        assert_eq!(err.message, "Invalid API key");
        assert_eq!(
            err.provider_detail.as_deref(),
            Some("Incorrect API key provided: sk-***")
        );
    }

    #[test]
    fn test_normalize_transport_error() {
        let err = normalize_transport_error("gpt-4", TransportError::Timeout("30s".into()));
        assert_eq!(err.kind, GenerationErrorKind::NetworkTimeout);

        let err = normalize_transport_error("gpt-4", TransportError::InvalidRequest("bad header".into()));
        assert_eq!(err.kind, GenerationErrorKind::BadRequest);
    }
}
