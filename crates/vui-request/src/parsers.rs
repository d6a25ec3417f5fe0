//! Built-in parsers that do not belong to any assistant platform

use tracing::debug;
use vui_request_core::{
    Context, DEFAULT_MATCH_PROBABILITY, Match, ParserMetadata, RawRequest, Request,
    RequestParser, RequestType,
};

/// Accepts payloads that are already in canonical shape:
/// `{"request": {...}, "session": {...}, "state": {...}}`.
///
/// The request object must carry a valid `type`; `session` and `state` are
/// optional objects merged into the respective outputs.
#[derive(Debug, Clone, Default)]
pub struct CanonicalJsonParser;

impl CanonicalJsonParser {
    pub fn new() -> Self {
        Self
    }
}

impl RequestParser for CanonicalJsonParser {
    fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> bool {
        let Some(payload) = raw.json() else {
            return false;
        };
        let Some(body) = payload.get("request").filter(|body| body.is_object()) else {
            return false;
        };

        let parsed = Request::from_value(body);
        if parsed.request_type().is_none() {
            debug!("canonical payload has no valid request type");
            return false;
        }

        *request = parsed;
        if let Some(value) = payload.get("session") {
            session.merge_value(value);
        }
        if let Some(value) = payload.get("state") {
            state.merge_value(value);
        }
        true
    }

    fn metadata(&self) -> ParserMetadata {
        ParserMetadata {
            name: Some("CanonicalJsonParser".to_string()),
            description: Some("Payloads already in canonical request shape".to_string()),
            platforms: vec!["canonical".to_string()],
            ..Default::default()
        }
    }
}

/// Accepts a bare utterance (any non-blank text that is not a JSON object or
/// array, well-formed or not) and turns it into an `INTENT` request with a
/// single match that carries the text verbatim and no intent name.
#[derive(Debug, Clone, Default)]
pub struct PlainTextParser {
    default_locale: Option<String>,
}

impl PlainTextParser {
    pub fn new(default_locale: Option<String>) -> Self {
        Self { default_locale }
    }
}

impl RequestParser for PlainTextParser {
    fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        _session: &mut Context,
        _state: &mut Context,
    ) -> bool {
        let Some(text) = raw.text() else {
            return false;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        match raw.json() {
            Some(value) if value.is_object() || value.is_array() => return false,
            None if trimmed.starts_with(['{', '[']) => {
                debug!("malformed JSON payload is not an utterance");
                return false;
            }
            _ => {}
        }

        let utterance = Match::builder()
            .raw_text(text)
            .probability(DEFAULT_MATCH_PROBABILITY)
            .locales(self.default_locale.iter().cloned())
            .build();

        let mut parsed = Request::builder()
            .request_type(RequestType::Intent)
            .matches([utterance])
            .build();
        parsed.set_request_locale(self.default_locale.clone());

        *request = parsed;
        true
    }

    fn metadata(&self) -> ParserMetadata {
        ParserMetadata {
            name: Some("PlainTextParser".to_string()),
            description: Some("Bare utterance text".to_string()),
            platforms: vec!["text".to_string()],
            ..Default::default()
        }
    }
}
