//! Config command handler

use crate::error::CliError;
use vui_request::VuiConfig;

/// Render the effective configuration as TOML
pub fn render_config(config: &VuiConfig) -> Result<String, CliError> {
    config
        .to_toml_string()
        .map_err(|e| CliError::Config(e.to_string()))
}

pub fn run_config(config: &VuiConfig) -> Result<(), CliError> {
    print!("{}", render_config(config)?);
    Ok(())
}
