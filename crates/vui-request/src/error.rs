//! Error types for vui-request crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VuiError {
    #[error("Core error: {0}")]
    Core(#[from] vui_request_core::CoreError),

    #[error("Build error: {0}")]
    Build(String),

    #[error("Request extension is not installed on this host")]
    NotInstalled,
}

pub type Result<T> = std::result::Result<T, VuiError>;
