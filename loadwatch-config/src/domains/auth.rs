//! Stress-test feed authentication configuration
//!
//! The stress-test feed identifies its caller with a single static API key
//! carried in a custom request header. The metrics feed is unauthenticated.

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Static API key configuration for the stress-test feed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Header name carrying the API key
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,

    /// The API key itself; usually supplied via environment
    #[serde(default)]
    pub api_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            api_key_header: default_api_key_header(),
            api_key: String::new(),
        }
    }
}

impl Validatable for AuthConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.api_key_header, "api_key_header", self.domain_name())?;

        // Header names must be ASCII without whitespace to survive the wire
        if self
            .api_key_header
            .chars()
            .any(|c| !c.is_ascii() || c.is_ascii_whitespace())
        {
            return Err(self.validation_error("api_key_header must be ASCII without whitespace"));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "auth"
    }
}

fn default_api_key_header() -> String {
    "X-API-KEY".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let config = AuthConfig::default();
        assert_eq!(config.api_key_header, "X-API-KEY");
        assert!(config.api_key.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_auth_config_validation() {
        let mut config = AuthConfig::default();
        config.api_key_header = String::new();
        assert!(config.validate().is_err());

        config.api_key_header = "X API KEY".to_string();
        assert!(config.validate().is_err());
    }
}
