//! The HTTP transport seam.
//!
//! [`ChatModel`](crate::ChatModel) talks to the network exclusively through
//! the [`Transport`] trait, so the exchange can be swapped out (most usefully
//! with a recording fake in tests). [`ReqwestTransport`] is the production
//! implementation.

use std::collections::BTreeMap;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method};
use thiserror::Error;
use tracing::debug;

/// A failure below the response-mapping layer.
///
/// These never escape [`ChatModel::call`](crate::ChatModel::call); the
/// orchestrator absorbs them into a synthesized error response.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("request serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Failure raised by a custom [`Transport`] implementation that fits
    /// neither of the above.
    #[error("{0}")]
    Other(String),
}

/// The raw result of one HTTP exchange: status, response headers collapsed
/// to their first value, and the body as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawExchange {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

/// Performs the HTTP exchange for a chat request.
///
/// Implementations must be safe for concurrent use; the client layer adds no
/// locking. Timeouts are the transport's concern — configure them on the
/// underlying HTTP client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network-level failure. A completed
    /// exchange with a non-2xx status is NOT an error here; it comes back as
    /// a [`RawExchange`] for the caller to interpret.
    async fn exchange(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: String,
    ) -> Result<RawExchange, TransportError>;
}

/// Production transport backed by [`reqwest::Client`].
///
/// # Example
///
/// ```
/// use gemini_chat::ReqwestTransport;
/// use std::time::Duration;
///
/// let client = reqwest::Client::builder()
///     .timeout(Duration::from_secs(120))
///     .build()
///     .expect("client configuration is valid");
/// let transport = ReqwestTransport::from_client(client);
/// # let _ = transport;
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default [`reqwest::Client`] (no timeout).
    #[must_use]
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Wraps a caller-configured client, keeping its timeouts, proxies, and
    /// TLS settings.
    #[must_use]
    pub const fn from_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn exchange(
        &self,
        method: Method,
        url: &str,
        headers: HeaderMap,
        body: String,
    ) -> Result<RawExchange, TransportError> {
        debug!(%method, url, "dispatching chat request");

        let response = self
            .client
            .request(method, url)
            .headers(headers)
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = first_value_headers(response.headers());
        let body = response.text().await?;

        debug!(status, body_len = body.len(), "chat response received");

        Ok(RawExchange {
            status,
            headers,
            body,
        })
    }
}

/// Collapses a multi-valued header map to first values. Values that are not
/// valid UTF-8 become empty strings rather than being dropped.
fn first_value_headers(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut collapsed = BTreeMap::new();
    for (name, value) in headers {
        collapsed
            .entry(name.as_str().to_string())
            .or_insert_with(|| value.to_str().unwrap_or("").to_string());
    }
    collapsed
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_first_value_headers_collapses_duplicates() {
        let mut headers = HeaderMap::new();
        headers.append("set-cookie", HeaderValue::from_static("a=1"));
        headers.append("set-cookie", HeaderValue::from_static("b=2"));
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let collapsed = first_value_headers(&headers);
        assert_eq!(collapsed.get("set-cookie").map(String::as_str), Some("a=1"));
        assert_eq!(
            collapsed.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(collapsed.len(), 2);
    }

    #[test]
    fn test_first_value_headers_non_utf8_value_becomes_empty() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-binary",
            HeaderValue::from_bytes(&[0xfa, 0xdf]).expect("opaque bytes are a valid header value"),
        );

        let collapsed = first_value_headers(&headers);
        assert_eq!(collapsed.get("x-binary").map(String::as_str), Some(""));
    }
}
