//! # vui-request core
//!
//! Canonical, platform independent model of a voice/chat assistant request
//! and the first-match-wins dispatch that fills it from platform payloads.

pub mod context;
pub mod error;
pub mod matches;
pub mod parser;
pub mod raw;
pub mod request;

pub use context::Context;
pub use error::{CoreError, Result};
pub use matches::{DEFAULT_MATCH_PROBABILITY, MappedValue, Match, MatchBuilder};
pub use parser::{Dispatcher, ParserExt, ParserMetadata, RequestParser, SharedParser};
pub use raw::RawRequest;
pub use request::{
    EndSessionReason, ErrorCode, Request, RequestBuilder, RequestError, RequestId, RequestType,
};
