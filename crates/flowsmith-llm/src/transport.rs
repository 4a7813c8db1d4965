// HTTP execution for adapter-built requests

use crate::types::{WireRequest, WireResponse};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("request could not be built: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// Only timeouts and dropped connections are worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, TransportError::Timeout(_) | TransportError::Connection(_))
    }
}

/// Issues a single HTTP exchange. Non-2xx statuses are not errors here;
/// they come back as a [`WireResponse`] for the adapter to classify.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        request: &WireRequest,
        timeout: Duration,
    ) -> std::result::Result<WireResponse, TransportError>;
}

/// reqwest-backed transport (HTTP direct, no provider SDKs)
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { http_client })
    }

    fn map_error(err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() || is_connection_reset(&err) {
            TransportError::Connection(err.to_string())
        } else if err.is_builder() {
            TransportError::InvalidRequest(err.to_string())
        } else {
            TransportError::Other(err.to_string())
        }
    }
}

fn is_connection_reset(err: &reqwest::Error) -> bool {
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        if let Some(io) = inner.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            );
        }
        source = inner.source();
    }
    false
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &WireRequest,
        timeout: Duration,
    ) -> std::result::Result<WireResponse, TransportError> {
        let mut builder = self
            .http_client
            .post(&request.url)
            .timeout(timeout)
            .json(&request.body);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(Self::map_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(Self::map_error)?;

        Ok(WireResponse { status, body })
    }
}
