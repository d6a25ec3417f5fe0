//! CLI command handlers

pub mod config;
pub mod parse;

pub use config::{render_config, run_config};
pub use parse::{normalize, read_payload, run_parse};
