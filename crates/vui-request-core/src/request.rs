//! Request: the platform independent representation of one inbound interaction

use crate::matches::Match;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;
use tracing::debug;

/// NewType pattern for Request ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(String);

impl RequestId {
    /// Create from existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Numeric id in the usual number-to-string form: shortest round-trip
    /// digits, exponent notation outside `[1e-6, 1e21)`. NaN has none.
    pub fn from_f64(n: f64) -> Option<Self> {
        if n.is_nan() {
            return None;
        }
        let magnitude = n.abs();
        let s = if n.is_infinite() {
            let sign = if n > 0.0 { "" } else { "-" };
            format!("{}Infinity", sign)
        } else if n == 0.0 {
            "0".to_string()
        } else if magnitude >= 1e21 || magnitude < 1e-6 {
            let exponential = format!("{:e}", n);
            match exponential.split_once('e') {
                Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                    format!("{}e+{}", mantissa, exponent)
                }
                _ => exponential,
            }
        } else {
            n.to_string()
        };
        Some(Self(s))
    }

    /// Strings are taken as-is and numbers are coerced to their string form
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self(s.clone())),
            Value::Number(n) => n
                .as_i64()
                .map(Self::from)
                .or_else(|| n.as_u64().map(Self::from))
                .or_else(|| n.as_f64().and_then(Self::from_f64)),
            _ => None,
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self(n.to_string())
    }
}

impl From<u64> for RequestId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of interaction a request describes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    StartSession,
    EndSession,
    Intent,
}

/// Why a session ended. Advisory: [`Request`] stores the reason as free text.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum EndSessionReason {
    UserInitiated,
    Error,
}

/// Known error codes. Advisory: [`RequestError`] accepts any string.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InternalServerError,
}

/// Upstream failure reported with a request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestError {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RequestError {
    pub fn new(error_type: Option<String>, message: Option<String>) -> Self {
        Self {
            error_type,
            message,
        }
    }

    pub fn from_code(code: ErrorCode, message: Option<String>) -> Self {
        Self::new(Some(code.to_string()), message)
    }

    /// Keep the string typed `type`/`message` fields of a JSON object.
    /// Returns `None` when neither is a string.
    pub fn from_value(value: &Value) -> Option<Self> {
        let text = |name: &str| value.get(name).and_then(Value::as_str).map(str::to_string);
        let error = Self::new(text("type"), text("message"));
        (!error.is_empty()).then_some(error)
    }

    pub fn is_empty(&self) -> bool {
        self.error_type.is_none() && self.message.is_none()
    }

    /// The error type as a known code, if it is one
    pub fn code(&self) -> Option<ErrorCode> {
        self.error_type.as_deref()?.parse().ok()
    }
}

/// One normalized inbound interaction
///
/// Each field is validated independently by its setter; a rejected value
/// leaves that field unset and never affects the others.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<RequestId>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    request_type: Option<RequestType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    time_stamp: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locale: Option<String>,
    matches: Vec<Match>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RequestError>,
}

impl Request {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new builder
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    /// Build a request from loosely typed JSON (`requestId`, `type`,
    /// `timeStamp`, `locale`, `matches`, `reason`, `error`).
    pub fn from_value(value: &Value) -> Self {
        let null = Value::Null;
        let field = |name: &str| value.get(name).unwrap_or(&null);

        let mut request = Self::new();
        request.set_request_id_value(field("requestId"));
        request.set_request_type_value(field("type"));
        request.set_request_time_stamp(value.get("timeStamp").cloned());
        request.set_request_locale(field("locale").as_str().map(str::to_string));
        request.set_request_matches(
            field("matches")
                .as_array()
                .into_iter()
                .flatten()
                .filter(|entry| entry.is_object())
                .map(Match::from_value),
        );
        request.set_request_reason(field("reason").as_str().map(str::to_string));
        request.set_request_error_value(field("error"));
        request
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn set_request_id(&mut self, request_id: Option<RequestId>) {
        self.request_id = request_id;
    }

    /// String ids are kept, numbers are coerced, anything else unsets the id
    pub fn set_request_id_value(&mut self, request_id: &Value) {
        self.request_id = RequestId::from_value(request_id);
        if self.request_id.is_none() && !request_id.is_null() {
            debug!(%request_id, "rejected request id");
        }
    }

    pub fn request_type(&self) -> Option<RequestType> {
        self.request_type
    }

    pub fn set_request_type(&mut self, request_type: Option<RequestType>) {
        self.request_type = request_type;
    }

    /// Accept one of `START_SESSION`, `END_SESSION`, `INTENT`; anything else
    /// unsets the type
    pub fn set_request_type_str(&mut self, request_type: &str) {
        self.request_type = request_type.parse().ok();
        if self.request_type.is_none() {
            debug!(request_type, "rejected request type");
        }
    }

    pub fn set_request_type_value(&mut self, request_type: &Value) {
        match request_type.as_str() {
            Some(s) => self.set_request_type_str(s),
            None => self.request_type = None,
        }
    }

    pub fn request_time_stamp(&self) -> Option<&Value> {
        self.time_stamp.as_ref()
    }

    /// Stored verbatim
    pub fn set_request_time_stamp(&mut self, time_stamp: Option<Value>) {
        self.time_stamp = time_stamp;
    }

    pub fn request_locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    pub fn set_request_locale(&mut self, locale: Option<String>) {
        self.locale = locale;
    }

    pub fn request_match_count(&self) -> usize {
        self.matches.len()
    }

    /// Match at `position`, `None` when out of bounds
    pub fn request_match(&self, position: usize) -> Option<&Match> {
        self.matches.get(position)
    }

    pub fn request_matches(&self) -> &[Match] {
        &self.matches
    }

    /// Replace every match with a clone of the given ones, so the caller's
    /// matches stay independent of this request
    pub fn set_request_matches<I, M>(&mut self, matches: I)
    where
        I: IntoIterator<Item = M>,
        M: Borrow<Match>,
    {
        self.matches = matches.into_iter().map(|m| m.borrow().clone()).collect();
    }

    pub fn request_reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub fn set_request_reason(&mut self, reason: Option<String>) {
        self.reason = reason;
    }

    /// The reason as a known end-session reason, if it is one
    pub fn end_session_reason(&self) -> Option<EndSessionReason> {
        self.reason.as_deref()?.parse().ok()
    }

    pub fn request_error(&self) -> Option<&RequestError> {
        self.error.as_ref()
    }

    /// Accepted when at least one of `type`/`message` is set
    pub fn set_request_error(&mut self, error: Option<RequestError>) {
        self.error = error.filter(|e| !e.is_empty());
    }

    pub fn set_request_error_value(&mut self, error: &Value) {
        self.error = RequestError::from_value(error);
        if self.error.is_none() && !error.is_null() {
            debug!(%error, "rejected request error");
        }
    }
}

impl From<Value> for Request {
    fn from(value: Value) -> Self {
        Self::from_value(&value)
    }
}

/// Builder for [`Request`]
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    inner: Request,
}

impl RequestBuilder {
    pub fn id(mut self, request_id: impl Into<RequestId>) -> Self {
        self.inner.set_request_id(Some(request_id.into()));
        self
    }

    pub fn request_type(mut self, request_type: RequestType) -> Self {
        self.inner.set_request_type(Some(request_type));
        self
    }

    pub fn time_stamp(mut self, time_stamp: impl Into<Value>) -> Self {
        self.inner.set_request_time_stamp(Some(time_stamp.into()));
        self
    }

    pub fn locale(mut self, locale: impl Into<String>) -> Self {
        self.inner.set_request_locale(Some(locale.into()));
        self
    }

    pub fn matches<I, M>(mut self, matches: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Borrow<Match>,
    {
        self.inner.set_request_matches(matches);
        self
    }

    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.inner.set_request_reason(Some(reason.into()));
        self
    }

    pub fn error(mut self, error: RequestError) -> Self {
        self.inner.set_request_error(Some(error));
        self
    }

    pub fn build(self) -> Request {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::MappedValue;
    use serde_json::json;

    fn book_flight() -> Match {
        Match::builder()
            .raw_text("book a flight")
            .probability(0.87)
            .intent_name("BookFlight")
            .mapped_value("destination", "NYC")
            .locales(["en-US"])
            .build()
    }

    #[test]
    fn test_request_with_one_match() {
        let request = Request::builder()
            .id("7")
            .request_type(RequestType::Intent)
            .time_stamp(1000)
            .locale("en-US")
            .matches([book_flight()])
            .build();

        assert_eq!(request.request_id().map(RequestId::as_str), Some("7"));
        assert_eq!(request.request_type(), Some(RequestType::Intent));
        assert_eq!(request.request_time_stamp(), Some(&json!(1000)));
        assert_eq!(request.request_locale(), Some("en-US"));
        assert_eq!(request.request_match_count(), 1);
        assert_eq!(
            request.request_match(0).and_then(Match::intent_name),
            Some("BookFlight")
        );
        assert!(request.request_match(1).is_none());
    }

    #[test]
    fn test_request_id_coercion() {
        let mut request = Request::new();
        request.set_request_id_value(&json!(42));
        assert_eq!(request.request_id().map(RequestId::as_str), Some("42"));

        request.set_request_id_value(&json!("abc"));
        assert_eq!(request.request_id().map(RequestId::as_str), Some("abc"));

        request.set_request_id_value(&json!(2.5));
        assert_eq!(request.request_id().map(RequestId::as_str), Some("2.5"));

        request.set_request_id_value(&json!({}));
        assert!(request.request_id().is_none());

        request.set_request_id_value(&json!("abc"));
        request.set_request_id_value(&json!([1]));
        assert!(request.request_id().is_none());

        assert_eq!(RequestId::from_f64(f64::NAN), None);
        assert_eq!(RequestId::from_f64(3.0).unwrap().as_str(), "3");
        assert_eq!(RequestId::from_f64(-0.0).unwrap().as_str(), "0");
    }

    #[test]
    fn test_request_id_exponent_form() {
        let id = |n: f64| RequestId::from_f64(n).map(|id| id.as_str().to_string());
        assert_eq!(id(1e21).as_deref(), Some("1e+21"));
        assert_eq!(id(-1.5e22).as_deref(), Some("-1.5e+22"));
        assert_eq!(id(1e-7).as_deref(), Some("1e-7"));
        assert_eq!(id(2.5e-8).as_deref(), Some("2.5e-8"));
        assert_eq!(id(1e20).as_deref(), Some("100000000000000000000"));
        assert_eq!(id(0.000001).as_deref(), Some("0.000001"));
        assert_eq!(id(-42.0).as_deref(), Some("-42"));
        assert_eq!(id(f64::NEG_INFINITY).as_deref(), Some("-Infinity"));
    }

    #[test]
    fn test_request_type_accepts_only_known_values() {
        let mut request = Request::new();
        request.set_request_type_str("INTENT");
        assert_eq!(request.request_type(), Some(RequestType::Intent));

        request.set_request_type_str("BOGUS");
        assert_eq!(request.request_type(), None);

        request.set_request_type_value(&json!("END_SESSION"));
        assert_eq!(request.request_type(), Some(RequestType::EndSession));

        request.set_request_type_value(&json!(1));
        assert_eq!(request.request_type(), None);

        let request = Request::from_value(&json!({"type": "BOGUS", "matches": []}));
        assert_eq!(request.request_type(), None);
        assert_eq!(request.request_match_count(), 0);
    }

    #[test]
    fn test_matches_are_defensive_clones() {
        let mut source = book_flight();
        let mut request = Request::new();
        request.set_request_matches([&source]);

        source.set_intent_name(Some("CancelFlight".to_string()));
        source.set_mapped_values(vec![MappedValue::new("destination", "SFO")]);

        let stored = request.request_match(0).unwrap();
        assert_eq!(stored.intent_name(), Some("BookFlight"));
        assert_eq!(stored.mapped_value("destination"), Some(&json!("NYC")));

        request.set_request_matches(Vec::<Match>::new());
        assert_eq!(request.request_match_count(), 0);
    }

    #[test]
    fn test_request_error_keeps_string_fields() {
        let mut request = Request::new();
        request.set_request_error_value(&json!({"type": "INTERNAL_SERVER_ERROR"}));
        assert_eq!(
            serde_json::to_value(request.request_error()).unwrap(),
            json!({"type": "INTERNAL_SERVER_ERROR"})
        );
        assert_eq!(
            request.request_error().and_then(RequestError::code),
            Some(ErrorCode::InternalServerError)
        );

        request.set_request_error_value(&json!({"type": 500, "message": "upstream timeout"}));
        assert_eq!(
            request.request_error(),
            Some(&RequestError::new(None, Some("upstream timeout".to_string())))
        );

        request.set_request_error_value(&json!({"type": 500}));
        assert!(request.request_error().is_none());

        request.set_request_error(Some(RequestError::default()));
        assert!(request.request_error().is_none());

        request.set_request_error(Some(RequestError::from_code(
            ErrorCode::InternalServerError,
            None,
        )));
        assert_eq!(
            request.request_error().and_then(|e| e.error_type.as_deref()),
            Some("INTERNAL_SERVER_ERROR")
        );
    }

    #[test]
    fn test_reason_is_advisory() {
        let mut request = Request::new();
        request.set_request_reason(Some("USER_INITIATED".to_string()));
        assert_eq!(
            request.end_session_reason(),
            Some(EndSessionReason::UserInitiated)
        );

        request.set_request_reason(Some("TIMED_OUT".to_string()));
        assert_eq!(request.request_reason(), Some("TIMED_OUT"));
        assert_eq!(request.end_session_reason(), None);
    }

    #[test]
    fn test_from_value_validates_fields_independently() {
        let request = Request::from_value(&json!({
            "requestId": {"nested": true},
            "type": "START_SESSION",
            "timeStamp": "2017-06-01T12:00:00Z",
            "locale": 5,
            "matches": [
                {"rawText": "hello", "intentName": "Greet"},
                "not a match"
            ],
            "reason": "USER_INITIATED",
            "error": {"message": "partial"}
        }));

        assert!(request.request_id().is_none());
        assert_eq!(request.request_type(), Some(RequestType::StartSession));
        assert_eq!(
            request.request_time_stamp(),
            Some(&json!("2017-06-01T12:00:00Z"))
        );
        assert_eq!(request.request_locale(), None);
        assert_eq!(request.request_match_count(), 1);
        assert_eq!(
            request.request_match(0).and_then(Match::raw_text),
            Some("hello")
        );
        assert_eq!(request.request_reason(), Some("USER_INITIATED"));
        assert_eq!(
            request.request_error().and_then(|e| e.message.as_deref()),
            Some("partial")
        );
    }

    #[test]
    fn test_serialize_omits_unset_fields() {
        let request = Request::builder().request_type(RequestType::EndSession).build();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"type": "END_SESSION", "matches": []})
        );
    }
}
