//! Parser trait and first-match-wins dispatch for vui-request-core
//!
//! A parser understands one platform's wire format. The [`Dispatcher`] holds
//! parsers in registration order and hands a raw payload to each in turn until
//! one of them accepts it.

use crate::{Context, CoreError, RawRequest, Request, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Translates one platform's raw payload into the canonical [`Request`]
///
/// Returning `true` means the payload was recognized and `request` (and
/// optionally `session`/`state`) has been populated. The dispatcher does not
/// roll back outputs of a parser that returns `false`, so implementations
/// should validate before they mutate.
pub trait RequestParser: Send + Sync {
    fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> bool;

    /// Optional method to get parser metadata
    fn metadata(&self) -> ParserMetadata {
        ParserMetadata::default()
    }

    /// Name used in logs, the metadata name or the short type name
    fn name(&self) -> String {
        self.metadata()
            .name
            .unwrap_or_else(|| short_type_name(std::any::type_name::<Self>()).to_string())
    }
}

/// Metadata about a parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParserMetadata {
    /// Human-readable name of the parser
    pub name: Option<String>,
    /// Description of what this parser accepts
    pub description: Option<String>,
    /// Platforms whose payloads the parser understands
    pub platforms: Vec<String>,
}

/// Arc-wrapped parser for thread-safe sharing
pub type SharedParser = Arc<dyn RequestParser>;

/// Extension trait for parser composition
pub trait ParserExt: RequestParser {
    /// Try this parser first and `next` when it declines
    fn or<P>(self, next: P) -> Dispatcher
    where
        Self: Sized + 'static,
        P: RequestParser + 'static,
    {
        let mut dispatcher = Dispatcher::new();
        dispatcher.add_request_parser(self).add_request_parser(next);
        dispatcher
    }

    /// Convert to a shared parser
    fn shared(self) -> SharedParser
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

// Implement ParserExt for all types that implement RequestParser
impl<T: RequestParser> ParserExt for T {}

impl<F> RequestParser for F
where
    F: Fn(&RawRequest, &mut Request, &mut Context, &mut Context) -> bool + Send + Sync,
{
    fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> bool {
        self(raw, request, session, state)
    }
}

/// Ordered, append-only parser registry
///
/// Register parsers at startup, then share the dispatcher (for example in an
/// `Arc`) once dispatch may run concurrently; `parse` only needs `&self`.
#[derive(Clone, Default)]
pub struct Dispatcher {
    parsers: Vec<SharedParser>,
}

impl Dispatcher {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parser after all previously registered ones
    pub fn add_request_parser(&mut self, parser: impl RequestParser + 'static) -> &mut Self {
        self.add_shared_parser(Arc::new(parser))
    }

    pub fn add_shared_parser(&mut self, parser: SharedParser) -> &mut Self {
        debug!(
            parser = %parser.name(),
            position = self.parsers.len(),
            "registered request parser"
        );
        self.parsers.push(parser);
        self
    }

    /// Registered parsers in dispatch order
    pub fn parsers(&self) -> &[SharedParser] {
        &self.parsers
    }

    pub fn parser_names(&self) -> Vec<String> {
        self.parsers.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Offer `raw` to each parser in registration order and stop at the first
    /// one that accepts it. Returns the accepting parser's metadata, with the
    /// name always filled in.
    pub fn try_parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> Result<ParserMetadata> {
        for (position, parser) in self.parsers.iter().enumerate() {
            trace!(parser = %parser.name(), position, "trying request parser");
            if parser.parse(raw, request, session, state) {
                let mut metadata = parser.metadata();
                let name = metadata.name.take().unwrap_or_else(|| parser.name());
                info!(parser = %name, position, "request parsed");
                metadata.name = Some(name);
                return Ok(metadata);
            }
        }

        warn!(attempted = self.parsers.len(), "no parser accepted the request");
        Err(CoreError::NoParserAccepted {
            attempted: self.parsers.len(),
        })
    }

    /// Boolean form of [`Dispatcher::try_parse`]
    pub fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> bool {
        self.try_parse(raw, request, session, state).is_ok()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("parsers", &self.parser_names())
            .finish()
    }
}

impl RequestParser for Dispatcher {
    fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> bool {
        Dispatcher::parse(self, raw, request, session, state)
    }

    fn metadata(&self) -> ParserMetadata {
        ParserMetadata {
            name: Some("Dispatcher".to_string()),
            description: Some(format!(
                "First of [{}] that accepts the request",
                self.parser_names().join(", ")
            )),
            ..Default::default()
        }
    }
}

/// Extract a short type name from the full module path.
///
/// Given `"my_crate::some_module::MyType"`, returns `"MyType"`.
fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}
