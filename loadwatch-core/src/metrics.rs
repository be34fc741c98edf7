//! Observable load metrics and the full-replacement reducer

use serde::{Deserialize, Serialize};

/// Snapshot of the backend's load counters
///
/// Replaced wholesale on every feed message. Fields are optional on
/// purpose: a message that omits a field yields a snapshot with that field
/// absent, never a stale carry-over from the previous message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricsSnapshot {
    /// Tokens consumed from the global rate-limit bucket
    pub global_tokens_used: Option<u64>,

    /// Capacity of the global rate-limit bucket
    pub global_token_bucket_cap: Option<u64>,

    /// Distinct users active in the trailing 30-minute window
    pub active_users: Option<u64>,

    /// URLs created in the trailing 1-hour window
    pub current_url_count: Option<u64>,
}

impl MetricsSnapshot {
    /// Percent of the global token bucket consumed.
    ///
    /// A zero or unknown capacity reads as 0.0 rather than dividing by
    /// zero; the raw fields stay visible for the operator to spot the
    /// anomaly. Over-capacity values are reported above 100.0 unclamped,
    /// since they signal an anomalous backend state.
    pub fn load_percent(&self) -> f64 {
        match (self.global_tokens_used, self.global_token_bucket_cap) {
            (Some(used), Some(cap)) if cap > 0 => used as f64 / cap as f64 * 100.0,
            _ => 0.0,
        }
    }
}

/// Parse one raw feed payload; None when empty or malformed.
pub(crate) fn parse_snapshot(payload: &str) -> Option<MetricsSnapshot> {
    if payload.trim().is_empty() {
        return None;
    }
    match serde_json::from_str(payload) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::debug!(error = %e, "skipping malformed metrics payload");
            None
        }
    }
}

/// Reduce one raw feed payload into the next snapshot.
///
/// Replacement, not merge: a valid payload becomes the snapshot exactly as
/// sent. An empty or unparseable payload keeps the previous snapshot.
pub fn reduce(previous: &MetricsSnapshot, payload: &str) -> MetricsSnapshot {
    parse_snapshot(payload).unwrap_or_else(|| previous.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> MetricsSnapshot {
        MetricsSnapshot {
            global_tokens_used: Some(1200),
            global_token_bucket_cap: Some(50000),
            active_users: Some(7),
            current_url_count: Some(431),
        }
    }

    #[test]
    fn test_valid_payload_replaces_snapshot() {
        let next = reduce(
            &full_snapshot(),
            r#"{"globalTokensUsed": 9, "globalTokenBucketCap": 10, "activeUsers": 1, "currentUrlCount": 2}"#,
        );
        assert_eq!(next.global_tokens_used, Some(9));
        assert_eq!(next.global_token_bucket_cap, Some(10));
        assert_eq!(next.active_users, Some(1));
        assert_eq!(next.current_url_count, Some(2));
    }

    #[test]
    fn test_omitted_fields_do_not_carry_over() {
        let next = reduce(&full_snapshot(), r#"{"globalTokensUsed": 5}"#);
        assert_eq!(next.global_tokens_used, Some(5));
        assert_eq!(next.global_token_bucket_cap, None);
        assert_eq!(next.active_users, None);
        assert_eq!(next.current_url_count, None);
    }

    #[test]
    fn test_malformed_payload_keeps_previous() {
        let previous = full_snapshot();
        assert_eq!(reduce(&previous, "not json"), previous);
        assert_eq!(reduce(&previous, ""), previous);
        assert_eq!(reduce(&previous, "   "), previous);
    }

    #[test]
    fn test_load_percent() {
        let snapshot = MetricsSnapshot {
            global_tokens_used: Some(25000),
            global_token_bucket_cap: Some(50000),
            ..Default::default()
        };
        assert!((snapshot.load_percent() - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_percent_is_not_clamped_above_100() {
        let snapshot = MetricsSnapshot {
            global_tokens_used: Some(150),
            global_token_bucket_cap: Some(100),
            ..Default::default()
        };
        assert!((snapshot.load_percent() - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_load_percent_guards_zero_or_missing_cap() {
        let zero_cap = MetricsSnapshot {
            global_tokens_used: Some(10),
            global_token_bucket_cap: Some(0),
            ..Default::default()
        };
        assert_eq!(zero_cap.load_percent(), 0.0);

        let missing_cap = MetricsSnapshot {
            global_tokens_used: Some(10),
            ..Default::default()
        };
        assert_eq!(missing_cap.load_percent(), 0.0);
        assert_eq!(MetricsSnapshot::default().load_percent(), 0.0);
    }
}
