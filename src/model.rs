//! The call-path orchestrator.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, warn};

use crate::request::ChatRequest;
use crate::response::ChatResponse;
use crate::transport::{RawExchange, ReqwestTransport, Transport, TransportError};
use crate::validation::{BasicRequestValidator, RequestValidator, ValidationError};

/// The `call` contract: one validated request in, one response out.
///
/// Mirrors [`ChatModel::call`]; exists so callers can depend on the contract
/// rather than the concrete orchestrator.
#[async_trait]
pub trait Model: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the request fails validation. No
    /// other failure is ever returned as an error; see [`ChatModel::call`].
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, ValidationError>;
}

/// Orchestrates one chat-completion call: validate, build headers, dispatch
/// through the [`Transport`], map the result.
///
/// Transport-level failures are absorbed into a synthesized error response —
/// `call` returns a [`ChatResponse`] for every request that passes
/// validation, whatever the network did.
///
/// # Example
///
/// ```no_run
/// use gemini_chat::{ChatModel, ChatRequest, RequestBody};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let model = ChatModel::with_defaults();
/// let request = ChatRequest::new(
///     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent",
///     RequestBody::from_text("What is 2 + 2?"),
/// )
/// .with_api_key(std::env::var("GEMINI_API_KEY")?);
///
/// let response = model.call(&request).await?;
/// if response.is_successful() {
///     println!("{}", response.text().unwrap_or_default());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ChatModel {
    transport: Arc<dyn Transport>,
    validator: Arc<dyn RequestValidator>,
}

impl ChatModel {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>, validator: Arc<dyn RequestValidator>) -> Self {
        Self {
            transport,
            validator,
        }
    }

    /// A model wired to [`ReqwestTransport`] and [`BasicRequestValidator`].
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(
            Arc::new(ReqwestTransport::new()),
            Arc::new(BasicRequestValidator),
        )
    }

    /// Calls the chat API and maps the response.
    ///
    /// The path is linear: validate, build headers, serialize, dispatch,
    /// map. Validation failures propagate before any I/O happens; every
    /// later failure is logged and converted into a status-500 response
    /// whose single candidate carries the failure text.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the request fails validation —
    /// the only error this method produces.
    pub async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, ValidationError> {
        self.validator.validate(request)?;

        match self.dispatch(request).await {
            Ok(exchange) => {
                debug!(status = exchange.status, "mapping chat response");
                Ok(ChatResponse::from_exchange(
                    exchange.status,
                    exchange.headers,
                    &exchange.body,
                ))
            }
            Err(failure) => {
                error!(error = %failure, "chat API call failed, synthesizing error response");
                Ok(ChatResponse::from_failure(&failure.to_string()))
            }
        }
    }

    async fn dispatch(&self, request: &ChatRequest) -> Result<RawExchange, TransportError> {
        let headers = build_headers(Some(request.headers()));
        let body = serde_json::to_string(request.body())?;
        self.transport
            .exchange(request.method().clone(), &request.url(), headers, body)
            .await
    }
}

#[async_trait]
impl Model for ChatModel {
    async fn call(&self, request: &ChatRequest) -> Result<ChatResponse, ValidationError> {
        Self::call(self, request).await
    }
}

/// Builds the outbound header set.
///
/// Guarantees a `Content-Type` (defaulted to `application/json` when the
/// caller supplied none), then overlays the caller's headers. Any
/// `Authorization` header is stripped last: credentials must travel via the
/// endpoint URL or the request's dedicated key field, never through generic
/// header passthrough. Names or values that are not valid HTTP are skipped
/// with a warning — building headers never fails.
pub(crate) fn build_headers(headers: Option<&BTreeMap<String, String>>) -> HeaderMap {
    let mut built = HeaderMap::new();

    let caller_sets_content_type = headers
        .is_some_and(|map| map.keys().any(|name| name.eq_ignore_ascii_case("content-type")));
    if !caller_sets_content_type {
        built.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    }

    if let Some(map) = headers {
        for (name, value) in map {
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                warn!(header = %name, "skipping invalid request header name");
                continue;
            };
            let Ok(header_value) = HeaderValue::from_str(value) else {
                warn!(header = %name, "skipping request header with invalid value");
                continue;
            };
            built.insert(header_name, header_value);
        }
    }

    built.remove(AUTHORIZATION);
    built
}
