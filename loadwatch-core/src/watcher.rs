//! Live subscription to the metrics feed

use loadwatch_config::LoadwatchConfig;
use loadwatch_stream::{StreamEvent, StreamResult, StreamSubscription, SubscribeOptions};
use tracing::{info, warn};

use crate::metrics::{parse_snapshot, MetricsSnapshot};

/// Folds the metrics feed into the current snapshot
///
/// Owns its subscription exclusively; a transport failure closes the feed
/// and ends the watcher without touching any other subscription. The feed
/// is not re-opened after a failure.
#[derive(Debug)]
pub struct MetricsWatcher {
    subscription: StreamSubscription,
    snapshot: MetricsSnapshot,
    last_error: Option<String>,
}

impl MetricsWatcher {
    /// Subscribe to the metrics feed named by the configuration. The
    /// metrics feed is unauthenticated.
    pub async fn connect(config: &LoadwatchConfig) -> StreamResult<Self> {
        let options = SubscribeOptions::new(config.server.metrics_url())
            .with_connect_timeout(config.http.connect_timeout)
            .with_verify_ssl(config.http.verify_ssl);
        Self::subscribe(options).await
    }

    /// Subscribe with explicit options
    pub async fn subscribe(options: SubscribeOptions) -> StreamResult<Self> {
        let subscription = StreamSubscription::open(options).await?;
        info!(url = subscription.url(), "subscribed to metrics feed");
        Ok(Self {
            subscription,
            snapshot: MetricsSnapshot::default(),
            last_error: None,
        })
    }

    /// Next snapshot, or None once the feed has dropped or been closed.
    /// Malformed frames are skipped without producing a snapshot.
    pub async fn next_snapshot(&mut self) -> Option<MetricsSnapshot> {
        loop {
            match self.subscription.next_event().await? {
                StreamEvent::Frame(frame) => {
                    // the metrics feed is untagged; named frames are not metrics
                    if frame.event.is_some() {
                        continue;
                    }
                    if let Some(next) = parse_snapshot(&frame.data) {
                        self.snapshot = next;
                        return Some(self.snapshot.clone());
                    }
                }
                StreamEvent::TransportError(reason) => {
                    warn!(reason = %reason, "metrics feed dropped");
                    self.last_error = Some(reason);
                    self.subscription.close();
                    return None;
                }
            }
        }
    }

    /// Most recently reduced snapshot
    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    /// Reason the feed ended, if it ended on a transport failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Tear down the feed; idempotent
    pub fn close(&mut self) {
        self.subscription.close();
    }
}
