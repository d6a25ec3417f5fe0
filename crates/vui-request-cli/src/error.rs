//! Error types for vui-request-cli

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Vui(#[from] vui_request::VuiError),

    #[error("Config error: {0}")]
    Config(String),
}
