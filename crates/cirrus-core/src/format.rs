//! Size and timestamp formatting for projected file records.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};

const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Convert a byte count to a human string using base-1024 units.
///
/// Picks the largest unit such that the scaled value is >= 1 (bounded above
/// by TB), rounds to 2 decimal places, and trims trailing zeros while always
/// keeping at least one decimal digit: `5242880 -> "5.0 MB"`,
/// `5505024 -> "5.25 MB"`. Zero bytes is exactly `"0B"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0B".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    let mut repr = format!("{:.2}", rounded);
    while repr.ends_with('0') {
        repr.pop();
    }
    if repr.ends_with('.') {
        repr.push('0');
    }

    format!("{} {}", repr, SIZE_UNITS[unit])
}

/// Interpret a raw JSON value as a non-negative byte count.
pub fn json_to_u64(value: &serde_json::Value) -> Option<u64> {
    match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Parse the provider's creation timestamp.
///
/// Accepts a Unix-epoch integer, a numeric string, or an ISO-8601 string
/// (`Z` treated as `+00:00`; a naive `YYYY-MM-DDTHH:MM:SS` is taken as
/// UTC). Returns `None` for anything unparseable: callers surface that as
/// an unknown timestamp instead of substituting the current time, which
/// would silently corrupt sort order and recency statistics.
pub fn parse_timestamp(value: &serde_json::Value) -> Option<DateTime<Utc>> {
    match value {
        serde_json::Value::Number(n) => {
            let secs = n.as_i64()?;
            Utc.timestamp_opt(secs, 0).single()
        }
        serde_json::Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }

    if s.chars().all(|c| c.is_ascii_digit()) {
        let secs = s.parse::<i64>().ok()?;
        return Utc.timestamp_opt(secs, 0).single();
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // Offset-less ISO form some providers emit.
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Render a creation instant as a fixed `"YYYY-MM-DD HH:MM:SS"` local-time
/// string for the listing page.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
