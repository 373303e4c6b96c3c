//! The outbound request model.

use std::collections::BTreeMap;

use reqwest::Method;

use crate::content::RequestBody;

/// A fully described chat-completion request: endpoint, method, headers, and
/// the structured prompt body.
///
/// The API key lives in its own field and is applied to the dispatch URL as a
/// `key` query parameter by [`ChatRequest::url`]. It is never sent as an
/// `Authorization` header; the header builder strips that header outright
/// (see [`crate::ChatModel`]).
///
/// # Example
///
/// ```
/// use gemini_chat::{ChatRequest, RequestBody};
///
/// let request = ChatRequest::new(
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent",
///     RequestBody::from_text("Hello, can you assist me?"),
/// )
/// .with_api_key("AIzaSy-example")
/// .with_header("X-Custom", "tracing-id-42");
///
/// assert!(request.url().ends_with("key=AIzaSy-example"));
/// assert!(!request.endpoint().contains("AIzaSy"));
/// ```
#[derive(Debug, Clone)]
pub struct ChatRequest {
    endpoint: String,
    api_key: Option<String>,
    method: Method,
    headers: BTreeMap<String, String>,
    body: RequestBody,
}

impl ChatRequest {
    /// Creates a POST request against `endpoint` carrying `body`.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, body: RequestBody) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            method: Method::POST,
            headers: BTreeMap::new(),
            body,
        }
    }

    /// Sets the API key to append to the dispatch URL.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Overrides the HTTP method (default POST).
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets a request header, replacing any previous value for the name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// The configured endpoint URL, without the API key applied.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// The URL actually dispatched: the endpoint with the API key appended
    /// as a `key` query parameter when one is set.
    #[must_use]
    pub fn url(&self) -> String {
        match &self.api_key {
            Some(key) => {
                let separator = if self.endpoint.contains('?') { '&' } else { '?' };
                format!("{}{}key={}", self.endpoint, separator, key)
            }
            None => self.endpoint.clone(),
        }
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }
}
