//! Server-sent-event subscription client for loadwatch
//!
//! The backend pushes two independent feeds over `text/event-stream`. The
//! native browser EventSource cannot attach custom headers, which the
//! stress-test feed requires; this client speaks SSE over a plain reqwest
//! GET instead, so any header or auth scheme can ride along.

pub mod errors;
pub mod parser;
pub mod subscription;

// Re-export main types for convenience
pub use errors::{StreamError, StreamResult};
pub use parser::{FrameParser, SseFrame};
pub use subscription::{StreamAuth, StreamEvent, StreamSubscription, SubscribeOptions};
