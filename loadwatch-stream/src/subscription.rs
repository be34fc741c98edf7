//! Subscription handle over a long-lived SSE connection

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;
use tracing::{debug, warn};

use crate::errors::{StreamError, StreamResult};
use crate::parser::{FrameParser, SseFrame};

/// Authentication applied to the subscription request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StreamAuth {
    #[serde(rename = "bearer")]
    Bearer { token: String },

    #[serde(rename = "basic")]
    Basic { username: String, password: String },

    #[serde(rename = "api_key")]
    ApiKey { header: String, key: String },
}

/// Options for opening a subscription
#[derive(Debug, Clone)]
pub struct SubscribeOptions {
    /// Feed URL (http or https)
    pub url: String,

    /// Extra HTTP headers to include
    pub headers: HashMap<String, String>,

    /// Authentication configuration
    pub auth: Option<StreamAuth>,

    /// Connection timeout; the stream itself is unbounded
    pub connect_timeout: Duration,

    /// Whether to verify SSL certificates
    pub verify_ssl: bool,

    /// User agent string
    pub user_agent: String,
}

impl SubscribeOptions {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            auth: None,
            connect_timeout: Duration::from_secs(10),
            verify_ssl: true,
            user_agent: "loadwatch/0.1".to_string(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_auth(mut self, auth: StreamAuth) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_verify_ssl(mut self, verify_ssl: bool) -> Self {
        self.verify_ssl = verify_ssl;
        self
    }
}

/// One delivery from the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// A parsed frame, in server-send order
    Frame(SseFrame),

    /// The connection dropped or the server closed the stream
    TransportError(String),
}

/// Exclusive handle to one live feed subscription
///
/// A spawned reader task parses the byte stream and forwards frames over a
/// bounded channel. Closing the handle aborts the reader, so data still in
/// flight is discarded rather than processed.
#[derive(Debug)]
pub struct StreamSubscription {
    events: mpsc::Receiver<StreamEvent>,
    reader: JoinHandle<()>,
    closed: bool,
    url: String,
}

impl StreamSubscription {
    /// Open a subscription to the given feed.
    ///
    /// Fails fast on an invalid URL, an unreachable host, or a non-2xx
    /// response; a successful return means the server accepted the stream.
    pub async fn open(options: SubscribeOptions) -> StreamResult<Self> {
        let parsed = url::Url::parse(&options.url).map_err(|e| StreamError::Configuration {
            message: format!("Invalid URL: {}", e),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(StreamError::Configuration {
                    message: format!(
                        "Unsupported URL scheme: {}. Only http and https are allowed.",
                        scheme
                    ),
                });
            }
        }

        // No total timeout: the stream stays open for the feed's lifetime
        let client = Client::builder()
            .connect_timeout(options.connect_timeout)
            .user_agent(&options.user_agent)
            .danger_accept_invalid_certs(!options.verify_ssl)
            .build()
            .map_err(|e| StreamError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        let mut builder = client.get(&options.url);
        for (key, value) in &options.headers {
            builder = builder.header(key, value);
        }
        builder = apply_auth(builder, options.auth.as_ref());
        builder = builder
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache");

        let response = builder.send().await.map_err(|e| StreamError::ConnectionFailed {
            message: format!("Failed to connect to {}: {}", options.url, e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::Rejected {
                status: status.as_u16(),
            });
        }

        let (tx, rx) = mpsc::channel(64);
        let mut byte_stream = response.bytes_stream();
        let url = options.url.clone();

        let reader = tokio::spawn(async move {
            let mut parser = FrameParser::new();
            loop {
                match byte_stream.next().await {
                    Some(Ok(chunk)) => {
                        for frame in parser.push(&chunk) {
                            if tx.send(StreamEvent::Frame(frame)).await.is_err() {
                                return; // receiver dropped
                            }
                        }
                    }
                    Some(Err(e)) => {
                        warn!(url = %url, error = %e, "feed transport failure");
                        let _ = tx.send(StreamEvent::TransportError(e.to_string())).await;
                        return;
                    }
                    None => {
                        debug!(url = %url, "feed closed by server");
                        let _ = tx
                            .send(StreamEvent::TransportError("stream ended".to_string()))
                            .await;
                        return;
                    }
                }
            }
        });

        Ok(Self {
            events: rx,
            reader,
            closed: false,
            url: options.url,
        })
    }

    /// Next event in server-send order; None once the subscription is
    /// closed and drained.
    pub async fn next_event(&mut self) -> Option<StreamEvent> {
        if self.closed {
            return None;
        }
        self.events.recv().await
    }

    /// Tear down the subscription. Safe to call any number of times; after
    /// the first call no further events are delivered.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.reader.abort();
        self.events.close();
        debug!(url = %self.url, "subscription closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Feed URL this subscription was opened against
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for StreamSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

/// Apply authentication to the request builder
fn apply_auth(builder: RequestBuilder, auth: Option<&StreamAuth>) -> RequestBuilder {
    match auth {
        Some(StreamAuth::Bearer { token }) => builder.bearer_auth(token),
        Some(StreamAuth::Basic { username, password }) => builder.basic_auth(username, Some(password)),
        Some(StreamAuth::ApiKey { header, key }) => builder.header(header, key),
        None => builder,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_rejects_empty_url() {
        let result = StreamSubscription::open(SubscribeOptions::new("")).await;
        assert!(matches!(result, Err(StreamError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_open_rejects_non_http_scheme() {
        let result = StreamSubscription::open(SubscribeOptions::new("ftp://example.com/feed")).await;
        assert!(matches!(result, Err(StreamError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_open_rejects_unparseable_url() {
        let result = StreamSubscription::open(SubscribeOptions::new("not-a-url")).await;
        assert!(matches!(result, Err(StreamError::Configuration { .. })));
    }

    #[test]
    fn test_auth_round_trips_through_serde() {
        let auth = StreamAuth::ApiKey {
            header: "X-API-KEY".to_string(),
            key: "Some-random_key".to_string(),
        };
        let serialized = serde_json::to_value(&auth).unwrap();
        let deserialized: StreamAuth = serde_json::from_value(serialized).unwrap();
        assert_eq!(auth, deserialized);
    }

    #[test]
    fn test_options_builder() {
        let options = SubscribeOptions::new("http://localhost:8090/api/stress-test/stream")
            .with_header("X-Trace", "1")
            .with_auth(StreamAuth::Bearer {
                token: "t".to_string(),
            })
            .with_connect_timeout(Duration::from_secs(3))
            .with_verify_ssl(false);

        assert_eq!(options.headers.get("X-Trace").map(String::as_str), Some("1"));
        assert!(options.auth.is_some());
        assert_eq!(options.connect_timeout, Duration::from_secs(3));
        assert!(!options.verify_ssl);
    }
}
