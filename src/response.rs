//! The response model and the JSON mapping path.
//!
//! [`ResponseBody::from_raw`] is deliberately total: whatever the upstream
//! service returns — well-formed JSON, garbage, an empty body — it produces a
//! usable [`ResponseBody`]. Degradation is recorded in [`MapOutcome`] rather
//! than surfaced as an error.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::warn;

use crate::content::{Content, Part};

/// Model version reported when the payload carries none.
const UNKNOWN_MODEL_VERSION: &str = "unknown";

/// Model version stamped on synthesized error responses.
const ERROR_MODEL_VERSION: &str = "gemini-flash-1.5";

/// Maximum characters of a raw upstream body kept in an error message.
const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// How a [`ResponseBody`] came to be.
///
/// The upstream payload and a parse failure both map to a body with zero
/// candidates; this tag is what tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapOutcome {
    /// The upstream payload parsed as JSON (it may still have carried no
    /// candidates).
    Parsed,
    /// The payload was not valid JSON; the body holds the empty defaults.
    Malformed,
    /// The body was fabricated client-side after a transport failure.
    Synthesized,
}

/// One alternative generated by the model: an ordered sequence of content
/// turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    content: Vec<Content>,
}

impl Candidate {
    #[must_use]
    pub fn new(content: Vec<Content>) -> Self {
        Self { content }
    }

    #[must_use]
    pub fn content(&self) -> &[Content] {
        &self.content
    }

    /// All text fragments of this candidate, concatenated in order.
    #[must_use]
    pub fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(Content::parts)
            .map(Part::text)
            .collect()
    }
}

/// Integer counters describing resource consumption of a model invocation,
/// keyed by metric name (`promptTokenCount`, `candidatesTokenCount`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageMetadata {
    counts: BTreeMap<String, i64>,
}

impl UsageMetadata {
    #[must_use]
    pub fn get(&self, metric: &str) -> Option<i64> {
        self.counts.get(metric).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.counts.iter().map(|(name, count)| (name.as_str(), *count))
    }
}

impl FromIterator<(String, i64)> for UsageMetadata {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().collect(),
        }
    }
}

/// The mapped body of a chat-completion response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBody {
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
    model_version: String,
    outcome: MapOutcome,
}

impl ResponseBody {
    /// Maps raw upstream text into a structured body.
    ///
    /// Never fails. Unparseable input degrades to an empty body tagged
    /// [`MapOutcome::Malformed`]; recognized fields are extracted
    /// tolerantly, with absent or mistyped fields falling back to defaults:
    ///
    /// - `candidates` absent → empty sequence (never null)
    /// - a candidate without `content.parts` → a [`Candidate`] with an empty
    ///   content sequence, kept in place
    /// - a part's `text` absent → empty string, which is then dropped
    /// - `usageMetadata` absent or not an object → `None`; non-integer
    ///   values inside it are skipped, not coerced
    /// - `model` absent or not a string → `"unknown"`
    ///
    /// # Example
    ///
    /// ```
    /// use gemini_chat::ResponseBody;
    ///
    /// let body = ResponseBody::from_raw(
    ///     r#"{"candidates":[{"content":{"parts":[{"text":"4"}]}}],
    ///         "usageMetadata":{"promptTokenCount":5},
    ///         "model":"gemini-2.0-flash"}"#,
    /// );
    /// assert_eq!(body.candidates().len(), 1);
    /// assert_eq!(body.candidates()[0].text(), "4");
    /// assert_eq!(body.model_version(), "gemini-2.0-flash");
    /// ```
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        let root: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(error) => {
                warn!(%error, "response body is not valid JSON, returning empty body");
                return Self::malformed();
            }
        };

        let candidates = root
            .get("candidates")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().map(map_candidate).collect())
            .unwrap_or_default();

        let usage_metadata = root
            .get("usageMetadata")
            .and_then(Value::as_object)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(name, value)| value.as_i64().map(|count| (name.clone(), count)))
                    .collect()
            });

        let model_version = root
            .get("model")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_MODEL_VERSION)
            .to_string();

        Self {
            candidates,
            usage_metadata,
            model_version,
            outcome: MapOutcome::Parsed,
        }
    }

    fn malformed() -> Self {
        Self {
            candidates: Vec::new(),
            usage_metadata: None,
            model_version: UNKNOWN_MODEL_VERSION.to_string(),
            outcome: MapOutcome::Malformed,
        }
    }

    /// Builds the body of a synthesized error response: one candidate whose
    /// single part carries the failure text.
    pub(crate) fn synthesized(message: &str) -> Self {
        Self {
            candidates: vec![Candidate::new(vec![Content::from_part(Part::response(
                message,
            ))])],
            usage_metadata: None,
            model_version: ERROR_MODEL_VERSION.to_string(),
            outcome: MapOutcome::Synthesized,
        }
    }

    /// Never null; empty when the upstream returned none or the body was
    /// unparseable.
    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// `None` when the upstream did not report usage.
    #[must_use]
    pub const fn usage_metadata(&self) -> Option<&UsageMetadata> {
        self.usage_metadata.as_ref()
    }

    #[must_use]
    pub fn model_version(&self) -> &str {
        &self.model_version
    }

    #[must_use]
    pub const fn outcome(&self) -> MapOutcome {
        self.outcome
    }
}

fn map_candidate(node: &Value) -> Candidate {
    let mut content = Vec::new();
    if let Some(parts) = node
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
    {
        for part in parts {
            let text = part.get("text").and_then(Value::as_str).unwrap_or("");
            if !text.is_empty() {
                content.push(Content::from_part(Part::response(text)));
            }
        }
    }
    Candidate::new(content)
}

/// The caller-facing result of [`crate::ChatModel::call`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    status_code: u16,
    headers: BTreeMap<String, String>,
    successful: bool,
    error_message: Option<String>,
    body: ResponseBody,
}

impl ChatResponse {
    /// Wraps a completed HTTP exchange. Success is the 2xx range; a non-2xx
    /// status additionally records a preview of the raw body as the error
    /// message.
    pub(crate) fn from_exchange(
        status_code: u16,
        headers: BTreeMap<String, String>,
        raw_body: &str,
    ) -> Self {
        let successful = (200..=299).contains(&status_code);
        let error_message =
            (!successful).then(|| truncate_preview(raw_body, ERROR_BODY_PREVIEW_LENGTH));
        Self {
            status_code,
            headers,
            successful,
            error_message,
            body: ResponseBody::from_raw(raw_body),
        }
    }

    /// The synthesized response returned when the transport itself failed:
    /// status 500, no headers, and a body carrying the failure text.
    pub(crate) fn from_failure(message: &str) -> Self {
        Self {
            status_code: 500,
            headers: BTreeMap::new(),
            successful: false,
            error_message: Some(message.to_string()),
            body: ResponseBody::synthesized(message),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub const fn is_successful(&self) -> bool {
        self.successful
    }

    /// Set on non-2xx statuses (a preview of the upstream body) and on
    /// synthesized failure responses (the failure text).
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub const fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// The first candidate's text, if any candidate carried text.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        self.body
            .candidates()
            .first()
            .map(Candidate::text)
            .filter(|text| !text.is_empty())
    }
}

/// Truncates on a char boundary so multi-byte UTF-8 never splits.
fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let cut = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= max_len)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());
    format!("{}...", &s[..cut])
}
