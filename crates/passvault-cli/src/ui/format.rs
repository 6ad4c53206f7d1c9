//! String formatting utilities for UI rendering.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Shown in place of masked field values.
pub const MASK: &str = "********";

/// Truncate a string to max length, adding ellipsis if needed.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        return s.to_string();
    }
    if max_len <= 3 {
        return s.chars().take(max_len).collect();
    }
    let truncated: String = s.chars().take(max_len - 3).collect();
    format!("{}...", truncated)
}

/// Format a short ID from a UUID (first 8 characters).
pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

/// Format a datetime for display.
pub fn format_datetime(dt: &DateTime<Utc>, pretty: bool) -> String {
    if pretty {
        dt.format("%Y-%m-%d %H:%M UTC").to_string()
    } else {
        dt.to_rfc3339()
    }
}

/// The value itself, or [`MASK`] when it must stay hidden.
pub fn mask(value: &str, masked: bool) -> &str {
    if masked {
        MASK
    } else {
        value
    }
}
