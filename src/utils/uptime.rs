//! Uptime helpers for health reporting

use chrono::{DateTime, Utc};

/// Seconds elapsed since `from`, with millisecond precision. Never negative.
pub fn uptime_seconds(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let millis = to.signed_duration_since(from).num_milliseconds().max(0);
    millis as f64 / 1000.0
}

/// 人类可读的运行时长（用于日志）
pub fn format_duration_human(from: DateTime<Utc>, to: DateTime<Utc>) -> String {
    let duration = to.signed_duration_since(from);
    let total = duration.num_seconds().max(0);

    let days = total / 86400;
    let hours = (total % 86400) / 3600;
    let minutes = (total % 3600) / 60;

    if days > 0 {
        if hours > 0 {
            format!("{}d {}h", days, hours)
        } else {
            format!("{}d", days)
        }
    } else if hours > 0 {
        if minutes > 0 {
            format!("{}h {}m", hours, minutes)
        } else {
            format!("{}h", hours)
        }
    } else if minutes > 0 {
        format!("{}m", minutes)
    } else {
        format!("{}s", total)
    }
}
