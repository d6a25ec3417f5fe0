//! Raw, platform specific payloads handed to parsers

use serde_json::Value;
use std::borrow::Cow;

/// A payload exactly as the host received it: either the body text or an
/// already decoded JSON document
#[derive(Debug, Clone, PartialEq)]
pub enum RawRequest {
    Text(String),
    Json(Value),
}

impl RawRequest {
    /// The payload as JSON, decoding text on demand. `None` if the text is
    /// not valid JSON.
    pub fn json(&self) -> Option<Cow<'_, Value>> {
        match self {
            RawRequest::Json(value) => Some(Cow::Borrowed(value)),
            RawRequest::Text(text) => serde_json::from_str(text).ok().map(Cow::Owned),
        }
    }

    /// The payload text, if it was received as text
    pub fn text(&self) -> Option<&str> {
        match self {
            RawRequest::Text(text) => Some(text),
            RawRequest::Json(_) => None,
        }
    }
}

impl From<String> for RawRequest {
    fn from(text: String) -> Self {
        RawRequest::Text(text)
    }
}

impl From<&str> for RawRequest {
    fn from(text: &str) -> Self {
        RawRequest::Text(text.to_string())
    }
}

impl From<Value> for RawRequest {
    fn from(value: Value) -> Self {
        RawRequest::Json(value)
    }
}
