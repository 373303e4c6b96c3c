//! A thin client for Gemini-style chat completion APIs.
//!
//! The crate does one thing: build an HTTP request from a structured prompt,
//! dispatch it, and map the JSON response into typed objects. There is no
//! retry logic, no streaming, and no connection management — the transport
//! is a pluggable seam ([`Transport`]) and everything above it is a single
//! linear path.
//!
//! Two failure classes, handled differently by design:
//!
//! - **Validation failures** are detected before any I/O and returned as
//!   [`ValidationError`] from [`ChatModel::call`].
//! - **Everything after validation** (network failure, unparseable response)
//!   is absorbed: `call` returns a well-formed [`ChatResponse`] with
//!   `success=false` and status 500 instead of an error.
//!
//! # Example
//!
//! ```no_run
//! use gemini_chat::{ChatModel, ChatRequest, RequestBody};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let model = ChatModel::with_defaults();
//!
//! let request = ChatRequest::new(
//!     "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent",
//!     RequestBody::from_text("Hello, can you assist me?"),
//! )
//! .with_api_key(std::env::var("GEMINI_API_KEY")?)
//! .with_header("X-Client-Tag", "docs-example");
//!
//! let response = model.call(&request).await?;
//! println!(
//!     "status={} model={} text={:?}",
//!     response.status_code(),
//!     response.body().model_version(),
//!     response.text(),
//! );
//! # Ok(())
//! # }
//! ```

mod content;
mod model;
mod request;
mod response;
mod transport;
mod validation;

pub use content::{Content, Direction, Part, RequestBody};
pub use model::{ChatModel, Model};
pub use request::ChatRequest;
pub use response::{Candidate, ChatResponse, MapOutcome, ResponseBody, UsageMetadata};
pub use transport::{RawExchange, ReqwestTransport, Transport, TransportError};
pub use validation::{BasicRequestValidator, RequestValidator, ValidationError};
