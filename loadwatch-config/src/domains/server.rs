//! Backend endpoint configuration

use crate::error::ConfigResult;
use crate::validation::{validate_http_url, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the backend, resolved once at startup
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the metrics feed
    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    /// Path of the stress-test feed
    #[serde(default = "default_stress_path")]
    pub stress_path: String,
}

impl ServerConfig {
    /// Full URL of the metrics feed
    pub fn metrics_url(&self) -> String {
        join_url(&self.base_url, &self.metrics_path)
    }

    /// Full URL of the stress-test feed
    pub fn stress_url(&self) -> String {
        join_url(&self.base_url, &self.stress_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            metrics_path: default_metrics_path(),
            stress_path: default_stress_path(),
        }
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.base_url, "base_url", self.domain_name())?;
        validate_required_string(&self.metrics_path, "metrics_path", self.domain_name())?;
        validate_required_string(&self.stress_path, "stress_path", self.domain_name())?;

        for (field, path) in [
            ("metrics_path", &self.metrics_path),
            ("stress_path", &self.stress_path),
        ] {
            if !path.starts_with('/') {
                return Err(self.validation_error(format!("{} must start with '/'", field)));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8090".to_string()
}

fn default_metrics_path() -> String {
    "/api/metrics/stream".to_string()
}

fn default_stress_path() -> String {
    "/api/stress-test/stream".to_string()
}
