//! HTTP transport boundary.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::GqlError;

/// Raw reply from one POST, before any decoding.
#[derive(Debug, Clone)]
pub struct TransportReply {
    /// HTTP status code.
    pub status: StatusCode,
    /// Raw response body.
    pub body: String,
}

/// Boundary to the HTTP layer.
///
/// Connection-level failures, including transport timeouts, surface as
/// recoverable [`GqlError::Http`] values; the status code of a completed
/// exchange is the caller's to judge.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body and return the raw reply.
    async fn post(
        &self,
        url: &str,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<TransportReply, GqlError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, GqlError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Duration::from_secs(30)).unwrap_or_else(|_| Self {
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        body: &Value,
        headers: HeaderMap,
    ) -> Result<TransportReply, GqlError> {
        let response = self.client.post(url).headers(headers).json(body).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok(TransportReply { status, body })
    }
}
