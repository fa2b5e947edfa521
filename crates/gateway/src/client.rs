//! One-shot HTTP client for the gateway's text-send endpoint.

use std::time::Duration;

use thiserror::Error;

use courier_common::config::AppConfig;

use crate::wire::{TextContent, TextMessageRequest};

/// Bound on any single gateway round trip. Exceeding it surfaces as a
/// [`TransportError`], never a hang.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const TEXT_SEND_PATH: &str = "/whatsapp/1/message/text";

/// Network-level failure reaching the gateway (connection refused, DNS,
/// timeout). Distinct from an HTTP-level rejection, which arrives as a
/// [`RawResponse`] with a non-success status.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError(err.to_string())
    }
}

/// What one gateway round trip produced, verbatim.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    /// Parsed `Retry-After` header value, in seconds.
    pub retry_after: Option<u64>,
    pub body: String,
}

/// One send attempt against the gateway.
///
/// Implementations perform exactly one network round trip and report exactly
/// what happened; no retry logic lives behind this seam.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, to: &str, text: &str) -> Result<RawResponse, TransportError>;
}

impl<T: Transport> Transport for &T {
    async fn send(&self, to: &str, text: &str) -> Result<RawResponse, TransportError> {
        (**self).send(to, text).await
    }
}

/// reqwest-backed gateway client.
pub struct HttpGatewayClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    sender: String,
}

impl HttpGatewayClient {
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_url: config.gateway_api_url.trim_end_matches('/').to_string(),
            api_key: config.gateway_api_key.clone(),
            sender: config.gateway_sender.clone(),
        })
    }
}

impl Transport for HttpGatewayClient {
    async fn send(&self, to: &str, text: &str) -> Result<RawResponse, TransportError> {
        let payload = TextMessageRequest {
            from: &self.sender,
            to,
            content: TextContent { text },
        };

        tracing::debug!(to, "Posting message to gateway");

        let response = self
            .http
            .post(format!("{}{}", self.api_url, TEXT_SEND_PATH))
            .header("Authorization", format!("App {}", self.api_key))
            .json(&payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            retry_after,
            body,
        })
    }
}
