//! Domain-specific configuration modules

pub mod auth;
pub mod http;
pub mod logging;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main loadwatch configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadwatchConfig {
    /// Backend endpoints
    #[serde(default)]
    pub server: server::ServerConfig,

    /// Stress-test feed authentication
    #[serde(default)]
    pub auth: auth::AuthConfig,

    /// HTTP client behavior
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl LoadwatchConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
