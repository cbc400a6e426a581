//! Loads the game configuration from TOML.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use platformer_core::GameConfig;

/// Parses and validates a TOML configuration document.
///
/// Missing keys fall back to their defaults.
pub fn parse(source: &str) -> Result<GameConfig> {
    let config: GameConfig = toml::from_str(source).context("malformed game configuration")?;
    config
        .validate()
        .context("game configuration is out of range")?;
    Ok(config)
}

/// Reads the configuration at `path`.
pub fn load(path: &Path) -> Result<GameConfig> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration from {}", path.display()))?;
    parse(&source).with_context(|| format!("invalid configuration in {}", path.display()))
}

/// Loads the configuration at `path` when provided, otherwise the defaults.
pub fn resolve(path: Option<&Path>) -> Result<GameConfig> {
    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            load(path)
        }
        None => Ok(GameConfig::default()),
    }
}
