//! Configuration loading from YAML files and environment variables

use crate::domains::LoadwatchConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;

/// Environment variables recognized as overrides
const ENV_BASE_URL: &str = "LOADWATCH_BASE_URL";
const ENV_API_KEY: &str = "LOADWATCH_API_KEY";
const ENV_API_KEY_HEADER: &str = "LOADWATCH_API_KEY_HEADER";
const ENV_LOG_LEVEL: &str = "LOADWATCH_LOG_LEVEL";

/// Load configuration: optional YAML file, then environment overrides,
/// then validation of the combined result.
pub fn load_config(path: Option<&Path>) -> ConfigResult<LoadwatchConfig> {
    let mut config = match path {
        Some(path) => from_file(path)?,
        None => LoadwatchConfig::default(),
    };

    apply_env_overrides(&mut config, &|name| std::env::var(name).ok())?;
    config.validate_all()?;
    Ok(config)
}

/// Parse a YAML configuration file
pub fn from_file(path: &Path) -> ConfigResult<LoadwatchConfig> {
    let content = std::fs::read_to_string(path)?;
    let config = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Apply environment overrides through an injectable lookup so tests do not
/// mutate process state.
fn apply_env_overrides(
    config: &mut LoadwatchConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> ConfigResult<()> {
    if let Some(base_url) = lookup(ENV_BASE_URL) {
        config.server.base_url = base_url;
    }
    if let Some(api_key) = lookup(ENV_API_KEY) {
        config.auth.api_key = api_key;
    }
    if let Some(header) = lookup(ENV_API_KEY_HEADER) {
        config.auth.api_key_header = header;
    }
    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        config.logging.level = level.parse().map_err(|e| {
            ConfigError::EnvError(format!("{}: {}", ENV_LOG_LEVEL, e))
        })?;
    }
    Ok(())
}
