//! Time utility functions

use chrono::{DateTime, Utc};

/// Milliseconds in one second
const MS_PER_SECOND: f64 = 1_000.0;

/// Milliseconds in one minute
const MS_PER_MINUTE: f64 = 60_000.0;

/// Format a millisecond count for display.
///
/// Shared by the waterfall axis markers and the per-row duration labels so
/// both always agree:
/// - below 1s: `"{n}ms"` (rounded to an integer)
/// - below 1m: `"{n.n}s"`
/// - otherwise: `"{n.n}m"`
///
/// Negative and non-finite inputs render as `"0ms"`.
pub fn format_time_label(ms: f64) -> String {
    if !ms.is_finite() || ms <= 0.0 {
        return "0ms".to_string();
    }
    if ms < MS_PER_SECOND {
        format!("{}ms", ms.round() as i64)
    } else if ms < MS_PER_MINUTE {
        format!("{:.1}s", ms / MS_PER_SECOND)
    } else {
        format!("{:.1}m", ms / MS_PER_MINUTE)
    }
}

/// Signed distance between two instants in fractional milliseconds
pub fn millis_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let delta = end - start;
    match delta.num_microseconds() {
        Some(us) => us as f64 / 1_000.0,
        None => delta.num_milliseconds() as f64,
    }
}

/// Format an instant for detail panels (millisecond precision, UTC)
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
