//! Core error types

use loadwatch_stream::StreamError;

/// Errors surfaced by the stress-test controller
#[derive(Debug, thiserror::Error)]
pub enum StressError {
    #[error("A stress test is already running")]
    AlreadyRunning,

    #[error(transparent)]
    Stream(#[from] StreamError),
}
