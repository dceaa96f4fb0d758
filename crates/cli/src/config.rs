//! TOML config loading.

use anyhow::{Context, Result};
use recon_core::Config;
use std::fs;
use std::path::Path;

/// Load a TOML config file, or the defaults when no file is given.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    parse_config(&raw).with_context(|| format!("invalid config {}", path.display()))
}

/// Parse TOML text; missing sections fall back to their defaults.
pub fn parse_config(raw: &str) -> Result<Config> {
    let config: Config = toml::from_str(raw)?;
    Ok(config)
}
