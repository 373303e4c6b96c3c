//! Prompt and content value objects.
//!
//! A [`RequestBody`] is an ordered sequence of [`Content`] turns, each an
//! ordered sequence of [`Part`] fragments. Serialization produces the wire
//! shape expected by `generateContent`-style endpoints:
//!
//! ```json
//! {"contents":[{"parts":[{"text":"..."}]}]}
//! ```
//!
//! All three types are immutable once constructed.

use serde::Serialize;
use serde::ser::SerializeStruct;

/// Which way a [`Part`] travels.
///
/// Outbound prompt text is [`Direction::Request`]; text extracted from a
/// model response is [`Direction::Response`]. The direction never appears on
/// the wire, it only records where the fragment came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Text authored by the caller, to be sent to the model.
    Request,
    /// Text produced by the model.
    Response,
}

/// The smallest unit of prompt or response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    direction: Direction,
    text: String,
}

impl Part {
    /// Creates an outbound (request-direction) part.
    #[must_use]
    pub fn request(text: impl Into<String>) -> Self {
        Self {
            direction: Direction::Request,
            text: text.into(),
        }
    }

    /// Creates an inbound (response-direction) part.
    #[must_use]
    pub fn response(text: impl Into<String>) -> Self {
        Self {
            direction: Direction::Response,
            text: text.into(),
        }
    }

    /// The text payload of this part.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

// Only the text crosses the wire; direction is client-side bookkeeping.
impl Serialize for Part {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("Part", 1)?;
        state.serialize_field("text", &self.text)?;
        state.end()
    }
}

/// One turn's worth of prompt or response material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    parts: Vec<Part>,
}

impl Content {
    #[must_use]
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    /// Convenience for the common single-fragment turn.
    #[must_use]
    pub fn from_part(part: Part) -> Self {
        Self { parts: vec![part] }
    }

    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// The ordered sequence of [`Content`] turns sent in one request.
///
/// # Example
///
/// ```
/// use gemini_chat::{Content, Part, RequestBody};
///
/// let body = RequestBody::new(vec![Content::from_part(Part::request(
///     "Hello, can you assist me?",
/// ))]);
/// assert_eq!(body.contents().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestBody {
    contents: Vec<Content>,
}

impl RequestBody {
    #[must_use]
    pub fn new(contents: Vec<Content>) -> Self {
        Self { contents }
    }

    /// Builds a single-turn, single-part body from prompt text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            contents: vec![Content::from_part(Part::request(text))],
        }
    }

    #[must_use]
    pub fn contents(&self) -> &[Content] {
        &self.contents
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_constructors_set_direction() {
        let outbound = Part::request("hi");
        assert_eq!(outbound.direction(), Direction::Request);
        assert_eq!(outbound.text(), "hi");

        let inbound = Part::response("hello");
        assert_eq!(inbound.direction(), Direction::Response);
        assert_eq!(inbound.text(), "hello");
    }

    #[test]
    fn test_part_serializes_text_only() {
        let part = Part::request("Hello");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Hello"}));

        // Direction never leaks into the wire format.
        let part = Part::response("Hello");
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json, serde_json::json!({"text": "Hello"}));
    }

    #[test]
    fn test_request_body_wire_shape() {
        let body = RequestBody::from_text("Hello, can you assist me?");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "contents": [
                    {"parts": [{"text": "Hello, can you assist me?"}]}
                ]
            })
        );
    }

    #[test]
    fn test_request_body_preserves_order() {
        let body = RequestBody::new(vec![
            Content::new(vec![Part::request("first"), Part::request("second")]),
            Content::from_part(Part::request("third")),
        ]);
        let json = serde_json::to_string(&body).unwrap();
        let first = json.find("first").unwrap();
        let second = json.find("second").unwrap();
        let third = json.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[test]
    fn test_empty_request_body() {
        let body = RequestBody::new(vec![]);
        assert!(body.is_empty());
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": []})
        );
    }
}
