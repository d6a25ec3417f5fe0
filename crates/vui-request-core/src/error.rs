//! Error types for vui-request-core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("No parser accepted the request ({attempted} attempted)")]
    NoParserAccepted { attempted: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
