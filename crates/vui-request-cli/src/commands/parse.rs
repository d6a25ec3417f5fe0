//! Parse command handler

use crate::OutputFormat;
use crate::error::CliError;
use serde_json::{Value, json};
use std::io::Read;
use std::path::Path;
use tracing::info;
use vui_request::{Context, RawRequest, Request, RequestAppExt, VuiApp, VuiConfig};

/// Read a payload from `path`, or from stdin when `path` is `-`.
/// With `decode_json` the payload must already be valid JSON.
pub fn read_payload(path: &Path, decode_json: bool) -> Result<RawRequest, CliError> {
    let content = if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(path)?
    };

    if decode_json {
        Ok(RawRequest::Json(serde_json::from_str(&content)?))
    } else {
        Ok(RawRequest::Text(content))
    }
}

/// Run the app's parsers over `raw` and describe the normalized result
pub fn normalize(app: &VuiApp, raw: &RawRequest) -> Result<Value, CliError> {
    let mut request = Request::new();
    let mut session = Context::new();
    let mut state = Context::new();
    let accepted = app.try_parse(raw, &mut request, &mut session, &mut state)?;
    info!(
        parser = accepted.name.as_deref().unwrap_or("unknown"),
        matches = request.request_match_count(),
        "payload normalized"
    );

    Ok(json!({
        "parser": accepted.name,
        "request": request,
        "session": session,
        "state": state,
    }))
}

/// Build an app from `config`, normalize the payload at `path` and print it
pub fn run_parse(
    config: VuiConfig,
    path: &Path,
    decode_json: bool,
    output: OutputFormat,
) -> Result<(), CliError> {
    let app = VuiApp::builder("vui-request").config(config).build()?;
    let raw = read_payload(path, decode_json)?;
    let report = normalize(&app, &raw)?;
    let rendered = match output {
        OutputFormat::Pretty => serde_json::to_string_pretty(&report)?,
        OutputFormat::Compact => serde_json::to_string(&report)?,
    };
    println!("{}", rendered);
    Ok(())
}
