//! Text rendering of feed state for the terminal

use loadwatch_core::MetricsSnapshot;

/// One metrics line: global bucket load, active users, URL count
pub fn render_snapshot(snapshot: &MetricsSnapshot) -> String {
    format!(
        "load {:>5.1}% ({} / {} tokens) | active users (30m): {} | urls (1h): {}",
        snapshot.load_percent(),
        field(snapshot.global_tokens_used),
        field(snapshot.global_token_bucket_cap),
        field(snapshot.active_users),
        field(snapshot.current_url_count),
    )
}

fn field(value: Option<u64>) -> String {
    match value {
        Some(n) => n.to_string(),
        None => "-".to_string(),
    }
}
