//! Time handling for device readings
//!
//! Devices report capture time (`dtt`) and ingest time (`dts`) as integer
//! milliseconds. Everything in the pipeline works on those raw millisecond
//! values; wall-clock formatting only happens at the export edge.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::constants::time::{
    MS_PER_MINUTE, MS_PER_SECOND, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE,
};

/// Timestamp in milliseconds since epoch (device-local capture clock)
pub type Timestamp = u64;

/// Clock consulted for metadata defaults and "last seen" labels
pub trait TimeSource {
    /// Milliseconds since the Unix epoch
    fn now(&self) -> Timestamp;
}

/// Wall clock in UTC
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> Timestamp {
        Timestamp::try_from(Utc::now().timestamp_millis()).unwrap_or(0)
    }
}

/// Clock pinned to one instant, for tests and replays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedTime(pub Timestamp);

impl FixedTime {
    /// Clock stuck at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self(timestamp)
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Elapsed milliseconds between two timestamps.
///
/// Out-of-order pairs yield zero rather than wrapping.
pub fn duration_ms(start: Timestamp, end: Timestamp) -> u64 {
    end.saturating_sub(start)
}

/// Convert a (possibly fractional) minute count into milliseconds.
///
/// Negative and non-finite inputs map to zero.
pub fn minutes_to_ms(minutes: f64) -> u64 {
    if !minutes.is_finite() || minutes <= 0.0 {
        return 0;
    }
    (minutes * MS_PER_MINUTE as f64).round() as u64
}

/// Convert milliseconds into fractional minutes
pub fn ms_to_minutes(ms: u64) -> f64 {
    ms as f64 / MS_PER_MINUTE as f64
}

/// Format a timestamp as an ISO-8601 UTC string with millisecond precision.
///
/// Timestamps beyond chrono's representable range fall back to the raw number.
pub fn format_iso8601(timestamp: Timestamp) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| timestamp.to_string())
}

/// Relative label such as `"just now"`, `"5m ago"`, `"3h ago"` or `"2d ago"`
pub fn time_ago(now: Timestamp, then: Timestamp) -> String {
    let seconds = duration_ms(then, now) / MS_PER_SECOND;
    if seconds < SECONDS_PER_MINUTE {
        return "just now".to_string();
    }
    if seconds < SECONDS_PER_HOUR {
        return format!("{}m ago", seconds / SECONDS_PER_MINUTE);
    }
    if seconds < SECONDS_PER_DAY {
        return format!("{}h ago", seconds / SECONDS_PER_HOUR);
    }
    format!("{}d ago", seconds / SECONDS_PER_DAY)
}
