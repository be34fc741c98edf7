//! Core domain logic for loadwatch
//!
//! Two independent feed consumers share one shape: subscribe to a
//! server-pushed event stream, reduce its messages into local state, tear
//! the channel down on terminal conditions. [`watcher::MetricsWatcher`]
//! folds the metrics feed into a [`metrics::MetricsSnapshot`];
//! [`controller::LoadTestController`] drives a stress-test run over the
//! authenticated stress feed. Each owns its own subscription handle, so one
//! feed's teardown can never touch the other.

pub mod controller;
pub mod error;
pub mod metrics;
pub mod stress;
pub mod watcher;

// Re-export main types for convenience
pub use controller::LoadTestController;
pub use error::StressError;
pub use metrics::{reduce, MetricsSnapshot};
pub use stress::{decode_frame, LoadTestRun, RunStatus, StressEvent, REJECTION_ADVISORY};
pub use watcher::MetricsWatcher;
