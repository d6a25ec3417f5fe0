//! Main crate for vui-request
//!
//! Installs platform independent request parsing on a host application and
//! ships the generic parsers and configuration around it.

pub mod app;
pub mod config;
pub mod error;
pub mod parsers;

// Re-export core types
pub use vui_request_core::{
    Context, CoreError, Dispatcher, EndSessionReason, ErrorCode, MappedValue, Match,
    MatchBuilder, ParserExt, ParserMetadata, RawRequest, Request, RequestBuilder, RequestError,
    RequestId, RequestParser, RequestType, SharedParser,
};

// Re-export app types
pub use app::{AppMetadata, RequestAppExt, RequestHost, VuiApp, VuiAppBuilder, add_request_to_app};

// Re-export config and parser types
pub use config::{ParsersConfig, VuiConfig};
pub use parsers::{CanonicalJsonParser, PlainTextParser};

// Re-export error types
pub use error::{Result as VuiResult, VuiError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::app::{RequestAppExt, RequestHost, VuiApp, add_request_to_app};
    pub use vui_request_core::{Context, Match, RawRequest, Request, RequestParser, RequestType};
}
