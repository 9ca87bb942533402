//! Best-effort date/time parsing
//!
//! TLC exports have used several textual layouts over the years. Layouts are
//! tried in a fixed order and the first one that consumes the whole string
//! wins. Anything else is rejected rather than guessed at; a rejected
//! timestamp parses to 0, which record validation then discards. Times at or
//! before the epoch are rejected too, which also catches two-digit years.

use chrono::NaiveDateTime;

/// Accepted layouts, in precedence order
const LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a UTC timestamp into seconds since the epoch.
///
/// Returns 0 when no layout matches or the time is not after the epoch.
pub fn parse_timestamp(text: &str) -> i64 {
    let text = text.trim();
    if text.is_empty() {
        return 0;
    }

    LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .map(|dt| dt.and_utc().timestamp())
        .filter(|&ts| ts > 0)
        .unwrap_or(0)
}
