//! Display formatting shared by the views.
//!
//! Dates are rendered in UTC.

use jiff::Timestamp;

/// Large counts as `1.5M` / `8.1K`, small ones verbatim.
pub fn compact_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Comment like counts only ever abbreviate to thousands.
pub fn comment_likes(n: u64) -> String {
    if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// `Mar 5, 2024`
pub fn date(ts: Timestamp) -> String {
    ts.strftime("%b %-d, %Y").to_string()
}

/// `Mar 5, 05:00 PM`
pub fn date_time(ts: Timestamp) -> String {
    ts.strftime("%b %-d, %I:%M %p").to_string()
}

/// `Mar 5, 05:00:09 PM`
pub fn date_time_seconds(ts: Timestamp) -> String {
    ts.strftime("%b %-d, %I:%M:%S %p").to_string()
}
