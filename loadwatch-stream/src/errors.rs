//! Stream subscription error types

/// Result type for subscription operations
pub type StreamResult<T> = Result<T, StreamError>;

/// Error type for subscription operations
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Subscription rejected with HTTP status {status}")]
    Rejected { status: u16 },
}
