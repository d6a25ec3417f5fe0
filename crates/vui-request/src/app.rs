//! Application layer for vui-request
//!
//! [`add_request_to_app`] installs request parsing on any type implementing
//! [`RequestHost`]; [`RequestAppExt`] then exposes parser registration,
//! dispatch and the Match/Request constructors on that host. [`VuiApp`] is a
//! ready-made host configured from [`VuiConfig`].

use crate::config::VuiConfig;
use crate::error::{Result, VuiError};
use crate::parsers::{CanonicalJsonParser, PlainTextParser};
use std::sync::Arc;
use tracing::{debug, info, warn};
use vui_request_core::{
    Context, Dispatcher, Match, MatchBuilder, ParserMetadata, RawRequest, Request,
    RequestBuilder, RequestParser, SharedParser,
};

/// A type request parsing can be installed on
pub trait RequestHost {
    /// The installed dispatcher, `None` until [`add_request_to_app`] runs
    fn request_dispatcher(&self) -> Option<&Dispatcher>;

    fn request_dispatcher_slot(&mut self) -> &mut Option<Dispatcher>;
}

/// Install request parsing on `app` with an empty parser registry.
///
/// Idempotent: returns `false` and leaves the host untouched when it is
/// already installed.
pub fn add_request_to_app<H: RequestHost + ?Sized>(app: &mut H) -> bool {
    let slot = app.request_dispatcher_slot();
    if slot.is_some() {
        debug!("request extension already installed");
        return false;
    }
    *slot = Some(Dispatcher::new());
    debug!("request extension installed");
    true
}

/// Request parsing on an installed host
pub trait RequestAppExt: RequestHost {
    fn request_already_added(&self) -> bool {
        self.request_dispatcher().is_some()
    }

    /// Registered parsers in dispatch order, empty when not installed
    fn parsers(&self) -> &[SharedParser] {
        self.request_dispatcher()
            .map(Dispatcher::parsers)
            .unwrap_or(&[])
    }

    /// Append a parser to the registry
    fn add_request_parser<P>(&mut self, parser: P) -> Result<&mut Self>
    where
        P: RequestParser + 'static,
    {
        let dispatcher = self
            .request_dispatcher_slot()
            .as_mut()
            .ok_or(VuiError::NotInstalled)?;
        dispatcher.add_request_parser(parser);
        Ok(self)
    }

    /// Offer `raw` to the registered parsers in order; `true` once one of
    /// them has populated `request`
    fn parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> bool {
        match self.request_dispatcher() {
            Some(dispatcher) => dispatcher.parse(raw, request, session, state),
            None => {
                warn!("request extension not installed, nothing can parse the request");
                false
            }
        }
    }

    /// Like [`RequestAppExt::parse`], reporting which parser accepted the request
    fn try_parse(
        &self,
        raw: &RawRequest,
        request: &mut Request,
        session: &mut Context,
        state: &mut Context,
    ) -> Result<ParserMetadata> {
        let dispatcher = self.request_dispatcher().ok_or(VuiError::NotInstalled)?;
        Ok(dispatcher.try_parse(raw, request, session, state)?)
    }

    /// Start building a canonical match
    fn new_match(&self) -> MatchBuilder {
        Match::builder()
    }

    /// Start building a canonical request
    fn new_request(&self) -> RequestBuilder {
        Request::builder()
    }
}

impl<H: RequestHost + ?Sized> RequestAppExt for H {}

/// The main vui-request application
pub struct VuiApp {
    /// Application metadata
    metadata: AppMetadata,
    /// Effective configuration
    config: VuiConfig,
    /// Installed request dispatcher
    request: Option<Dispatcher>,
}

/// Metadata about the application
#[derive(Debug, Clone)]
pub struct AppMetadata {
    pub name: String,
    pub version: String,
}

impl VuiApp {
    /// Create a new app without request parsing installed
    pub fn new(metadata: AppMetadata, config: VuiConfig) -> Self {
        Self {
            metadata,
            config,
            request: None,
        }
    }

    /// Get app metadata
    pub fn metadata(&self) -> &AppMetadata {
        &self.metadata
    }

    pub fn config(&self) -> &VuiConfig {
        &self.config
    }

    /// Create a new builder
    pub fn builder(name: impl Into<String>) -> VuiAppBuilder {
        VuiAppBuilder::new(name)
    }
}

impl RequestHost for VuiApp {
    fn request_dispatcher(&self) -> Option<&Dispatcher> {
        self.request.as_ref()
    }

    fn request_dispatcher_slot(&mut self) -> &mut Option<Dispatcher> {
        &mut self.request
    }
}

/// Builder for creating vui-request applications
pub struct VuiAppBuilder {
    name: String,
    version: String,
    config: VuiConfig,
    parsers: Vec<SharedParser>,
}

impl VuiAppBuilder {
    /// Create a new builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            config: VuiConfig::default(),
            parsers: Vec::new(),
        }
    }

    /// Set the version
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set the configuration
    pub fn config(mut self, config: VuiConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a parser; these run before the built-in ones
    pub fn parser(mut self, parser: impl RequestParser + 'static) -> Self {
        self.parsers.push(Arc::new(parser));
        self
    }

    /// Build the application with request parsing installed
    pub fn build(self) -> Result<VuiApp> {
        let metadata = AppMetadata {
            name: self.name,
            version: self.version,
        };
        let mut app = VuiApp::new(metadata, self.config.clone());
        add_request_to_app(&mut app);

        let dispatcher = app.request.get_or_insert_with(Dispatcher::new);
        for parser in self.parsers {
            dispatcher.add_shared_parser(parser);
        }
        if self.config.parsers.canonical {
            dispatcher.add_request_parser(CanonicalJsonParser::new());
        }
        if self.config.parsers.plain_text {
            dispatcher.add_request_parser(PlainTextParser::new(self.config.default_locale));
        }
        if dispatcher.is_empty() {
            return Err(VuiError::Build("No parser configured".to_string()));
        }

        info!(
            app = %app.metadata.name,
            parsers = ?dispatcher.parser_names(),
            "request parsing ready"
        );
        Ok(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParsersConfig;
    use vui_request_core::RequestType;

    #[test]
    fn test_app_builder() {
        let app = VuiApp::builder("test-app").version("1.0.0").build().unwrap();

        assert_eq!(app.metadata().name, "test-app");
        assert!(app.request_already_added());
        assert_eq!(
            app.request_dispatcher().unwrap().parser_names(),
            ["CanonicalJsonParser", "PlainTextParser"]
        );

        let mut request = Request::new();
        assert!(app.parse(
            &RawRequest::from("turn it up"),
            &mut request,
            &mut Context::new(),
            &mut Context::new()
        ));
        assert_eq!(request.request_type(), Some(RequestType::Intent));
    }

    #[test]
    fn test_build_without_parsers_fails() {
        let config = VuiConfig {
            parsers: ParsersConfig {
                canonical: false,
                plain_text: false,
            },
            ..Default::default()
        };
        let result = VuiApp::builder("empty").config(config).build();
        assert!(matches!(result, Err(VuiError::Build(_))));
    }

    #[test]
    fn test_uninstalled_host() {
        let mut app = VuiApp::new(
            AppMetadata {
                name: "bare".to_string(),
                version: "0.0.0".to_string(),
            },
            VuiConfig::default(),
        );
        assert!(!app.request_already_added());
        assert!(app.parsers().is_empty());
        assert!(matches!(
            app.add_request_parser(CanonicalJsonParser),
            Err(VuiError::NotInstalled)
        ));

        let mut request = Request::new();
        let raw = RawRequest::from("hello");
        assert!(!app.parse(&raw, &mut request, &mut Context::new(), &mut Context::new()));
        assert!(matches!(
            app.try_parse(&raw, &mut request, &mut Context::new(), &mut Context::new()),
            Err(VuiError::NotInstalled)
        ));
    }
}
