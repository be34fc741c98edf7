//! Domain-driven configuration for loadwatch
//!
//! Configuration is split by functional domain (server endpoints, feed
//! authentication, HTTP behavior, logging), each with serde defaults and
//! validation. A YAML file is optional; environment variables override it.

pub mod error;
pub mod loader;
pub mod validation;

pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::load_config;

pub use domains::{
    auth::AuthConfig,
    http::HttpConfig,
    logging::{LogLevel, LoggingConfig},
    server::ServerConfig,
    LoadwatchConfig,
};

pub use domains::utils::serde_duration;
