//! Stress-test run lifecycle
//!
//! A run moves Ready -> Running -> Done, with two ways out of Running that
//! must stay distinct: a backend-reported `{error}` payload means the test
//! ran and failed (Done), while a rejection at the transport level means
//! the test never usefully started and the run falls back to Ready with a
//! fixed advisory.

use loadwatch_stream::SseFrame;
use serde::Deserialize;
use tracing::debug;

/// Advisory shown when the feed rejects or drops the subscription
pub const REJECTION_ADVISORY: &str =
    "Rate limit for stress test feature reached or connection may have failed. Try again in a minute.";

/// Run lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunStatus {
    #[default]
    Ready,
    Running,
    Done,
}

/// A decoded stress-feed event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StressEvent {
    /// Incremental output line
    Output(String),

    /// Terminal success, with the feed's final line if it sent one
    Done(Option<String>),

    /// Terminal failure reported by the backend inside the feed
    Failed(String),

    /// Feed-level rejection or transport failure; the run never usefully
    /// started
    Rejected,
}

#[derive(Debug, Deserialize)]
struct StressPayload {
    error: Option<String>,
    #[serde(rename = "outputLine")]
    output_line: Option<String>,
}

/// Decode one feed frame into a run event; None means the frame carries
/// nothing actionable and is skipped.
pub fn decode_frame(frame: &SseFrame) -> Option<StressEvent> {
    match frame.event.as_deref() {
        // tagged rejection carries no payload
        Some("error") => Some(StressEvent::Rejected),
        Some("done") => {
            let line = serde_json::from_str::<StressPayload>(&frame.data)
                .ok()
                .and_then(|payload| payload.output_line);
            Some(StressEvent::Done(line))
        }
        Some(other) => {
            debug!(event = other, "ignoring unknown stress feed event");
            None
        }
        None => {
            let payload: StressPayload = match serde_json::from_str(&frame.data) {
                Ok(payload) => payload,
                Err(e) => {
                    debug!(error = %e, "skipping malformed stress feed payload");
                    return None;
                }
            };
            // an error field wins over any output line in the same payload
            if let Some(error) = payload.error {
                Some(StressEvent::Failed(error))
            } else {
                payload.output_line.map(StressEvent::Output)
            }
        }
    }
}

/// State of one stress-test run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadTestRun {
    status: RunStatus,
    output_log: Vec<String>,
    error_message: Option<String>,
}

impl LoadTestRun {
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Output lines appended so far, in arrival order
    pub fn output_log(&self) -> &[String] {
        &self.output_log
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Enter Running with a cleared log and error
    pub(crate) fn begin(&mut self) {
        *self = Self {
            status: RunStatus::Running,
            ..Self::default()
        };
    }

    /// Apply a decoded event; returns true when the event moves the run
    /// out of Running. Events arriving outside Running are ignored.
    pub(crate) fn apply(&mut self, event: &StressEvent) -> bool {
        if self.status != RunStatus::Running {
            return false;
        }
        match event {
            StressEvent::Output(line) => {
                self.output_log.push(line.clone());
                false
            }
            StressEvent::Done(line) => {
                if let Some(line) = line {
                    self.output_log.push(line.clone());
                }
                self.status = RunStatus::Done;
                true
            }
            StressEvent::Failed(message) => {
                self.error_message = Some(message.clone());
                self.status = RunStatus::Done;
                true
            }
            StressEvent::Rejected => {
                self.error_message = Some(REJECTION_ADVISORY.to_string());
                self.status = RunStatus::Ready;
                true
            }
        }
    }

    /// Back to Ready with history cleared
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }
}
