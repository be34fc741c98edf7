//! Stress-test controller: one run, at most one live feed subscription

use loadwatch_config::LoadwatchConfig;
use loadwatch_stream::{StreamAuth, StreamEvent, StreamSubscription, SubscribeOptions};
use tracing::{info, warn};

use crate::error::StressError;
use crate::stress::{decode_frame, LoadTestRun, RunStatus, StressEvent};

/// Drives the stress-test run lifecycle over the authenticated feed
///
/// The controller owns the run state and the subscription exclusively.
/// Whatever path takes the run out of Running also closes the
/// subscription, so a finished or rejected run never holds a channel open.
#[derive(Debug)]
pub struct LoadTestController {
    options: SubscribeOptions,
    run: LoadTestRun,
    subscription: Option<StreamSubscription>,
}

impl LoadTestController {
    pub fn new(config: &LoadwatchConfig) -> Self {
        let options = SubscribeOptions::new(config.server.stress_url())
            .with_auth(StreamAuth::ApiKey {
                header: config.auth.api_key_header.clone(),
                key: config.auth.api_key.clone(),
            })
            .with_connect_timeout(config.http.connect_timeout)
            .with_verify_ssl(config.http.verify_ssl);

        Self {
            options,
            run: LoadTestRun::default(),
            subscription: None,
        }
    }

    pub fn run(&self) -> &LoadTestRun {
        &self.run
    }

    pub fn status(&self) -> RunStatus {
        self.run.status()
    }

    /// Whether the start affordance is available
    pub fn can_start(&self) -> bool {
        self.run.status() != RunStatus::Running
    }

    /// Whether the stop/reset affordance is available
    pub fn can_reset(&self) -> bool {
        self.run.status() != RunStatus::Ready
    }

    /// Whether a feed subscription is currently live
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }

    /// Start a new run.
    ///
    /// Rejected outright while one is already Running. Any stale
    /// subscription from a previous run is closed before the new one
    /// opens, so two channels never race on the same output log. If the
    /// feed cannot be opened the run lands back in Ready with the advisory
    /// set, and the underlying error is returned for the caller to log.
    pub async fn start(&mut self) -> Result<(), StressError> {
        if self.run.status() == RunStatus::Running {
            return Err(StressError::AlreadyRunning);
        }
        self.close_subscription();
        self.run.begin();

        match StreamSubscription::open(self.options.clone()).await {
            Ok(subscription) => {
                info!(url = subscription.url(), "stress test started");
                self.subscription = Some(subscription);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to open stress feed");
                self.run.apply(&StressEvent::Rejected);
                Err(e.into())
            }
        }
    }

    /// Await, decode and apply the next feed event.
    ///
    /// Frames that decode to nothing are skipped. Returns the applied
    /// event, or None once there is no live subscription. Any event that
    /// moves the run out of Running closes the subscription before this
    /// returns.
    pub async fn next_transition(&mut self) -> Option<StressEvent> {
        loop {
            let subscription = self.subscription.as_mut()?;
            let event = match subscription.next_event().await {
                Some(StreamEvent::Frame(frame)) => match decode_frame(&frame) {
                    Some(event) => event,
                    None => continue,
                },
                // a dropped channel and a tagged rejection look the same
                // to the run: it never usefully started
                Some(StreamEvent::TransportError(_)) | None => StressEvent::Rejected,
            };

            if self.run.apply(&event) {
                self.close_subscription();
            }
            return Some(event);
        }
    }

    /// Stop a running test or clear a finished one; back to Ready with
    /// empty history.
    pub fn reset(&mut self) {
        self.close_subscription();
        self.run.clear();
    }

    fn close_subscription(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.close();
        }
    }
}
