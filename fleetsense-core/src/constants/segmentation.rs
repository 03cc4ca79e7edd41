//! Event Segmentation Defaults
//!
//! A run is kept together while each new value stays within
//! `grouping_threshold × running_average` of the run's own mean. Runs shorter
//! than the minimum duration are discarded.

use super::time::MS_PER_MINUTE;

/// Default tolerance band as a fraction of the running average (10%).
pub const DEFAULT_GROUPING_THRESHOLD: f64 = 0.10;

/// Default minimum event duration in minutes.
pub const DEFAULT_MIN_DURATION_MINUTES: u64 = 5;

/// Default minimum event duration in milliseconds.
pub const DEFAULT_MIN_DURATION_MS: u64 = DEFAULT_MIN_DURATION_MINUTES * MS_PER_MINUTE;

/// Settings express the grouping threshold in percent.
pub const PERCENT_SCALE: f64 = 100.0;

/// Tolerance preset for noisy analog channels (load cells, fuel floats).
pub const LOOSE_GROUPING_THRESHOLD: f64 = 0.20;

/// Tolerance preset for stable digital channels (battery, probes).
pub const TIGHT_GROUPING_THRESHOLD: f64 = 0.05;
