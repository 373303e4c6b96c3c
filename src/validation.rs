//! Pre-dispatch request validation.
//!
//! Validation is the one failure that crosses the [`crate::ChatModel::call`]
//! boundary as an error, and it always runs before any network I/O.

use reqwest::Url;
use thiserror::Error;

use crate::request::ChatRequest;

/// A structurally invalid request, detected before dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("request validation failed: {message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// A pluggable predicate over [`ChatRequest`], run before dispatch.
///
/// Implementations must be side-effect free apart from the returned error,
/// and safe to share across concurrent calls.
pub trait RequestValidator: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when the request is structurally
    /// invalid.
    fn validate(&self, request: &ChatRequest) -> Result<(), ValidationError>;
}

/// The default rule set: an absolute http(s) endpoint and a non-empty body.
///
/// # Example
///
/// ```
/// use gemini_chat::{BasicRequestValidator, ChatRequest, RequestBody, RequestValidator};
///
/// let validator = BasicRequestValidator;
/// let request = ChatRequest::new("not a url", RequestBody::from_text("hi"));
/// assert!(validator.validate(&request).is_err());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRequestValidator;

impl RequestValidator for BasicRequestValidator {
    fn validate(&self, request: &ChatRequest) -> Result<(), ValidationError> {
        if request.endpoint().trim().is_empty() {
            return Err(ValidationError::new("endpoint must not be empty"));
        }

        let url = Url::parse(request.endpoint())
            .map_err(|error| ValidationError::new(format!("endpoint is not a valid URL: {error}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ValidationError::new(format!(
                "endpoint scheme must be http or https, got {}",
                url.scheme()
            )));
        }

        if request.body().is_empty() {
            return Err(ValidationError::new(
                "request body must contain at least one content turn",
            ));
        }

        Ok(())
    }
}
