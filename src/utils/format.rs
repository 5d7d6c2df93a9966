// src/utils/format.rs
use chrono::{DateTime, Utc};

// Format a timestamp relative to now for the history view
pub fn format_time_ago(time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(time);
    let seconds = duration.num_seconds().max(0);

    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", duration.num_minutes())
    } else if seconds < 86400 {
        format!("{} hours ago", duration.num_hours())
    } else {
        format!("{} days ago", duration.num_days())
    }
}

pub fn format_entropy(bits: f64) -> String {
    format!("{:.1} bits", bits)
}
