//! Event Segmenter
//!
//! ## Overview
//!
//! Splits one sensor's time series into contiguous runs of "similar" values
//! and keeps the runs that last long enough to matter: a truck parked on a
//! scale, a cold-chain box holding temperature, a tank sitting at one level.
//!
//! ## Algorithm
//!
//! Single pass over the non-null values in reading order:
//!
//! ```text
//! no run      ── v ──→ start run {v}
//! run(avg)    ── |v - avg| ≤ avg × threshold ──→ extend run, avg = mean(members)
//! run(avg)    ── otherwise ──→ finalize run, start run {v}
//! end of data ──→ finalize run
//! ```
//!
//! A finalized run is emitted as an [`EventGroup`] iff
//! `end_time - start_time ≥ min_duration`. A single-member run lasts zero
//! milliseconds, so it only survives when the minimum duration is zero.
//!
//! ## Properties
//!
//! - Runs partition the non-null value sequence: concatenating every run
//!   (emitted or not) reproduces it. [`Segmenter::runs`] exposes all of them.
//! - Emitted groups are ordered by start time and never overlap.
//! - O(n) time, O(longest run) memory, no recursion.
//!
//! The tolerance band scales with the running average, so it has no width at
//! zero and is empty for negative averages: such values never group.

mod analysis;
mod group;

pub use analysis::{analyze_device, DeviceEvents, SensorEvents};
pub use group::EventGroup;

use serde::{Deserialize, Serialize};

use crate::constants::segmentation::{
    DEFAULT_GROUPING_THRESHOLD, DEFAULT_MIN_DURATION_MS, LOOSE_GROUPING_THRESHOLD, PERCENT_SCALE,
    TIGHT_GROUPING_THRESHOLD,
};
use crate::errors::{ConfigError, ConfigResult};
use crate::time::{duration_ms, minutes_to_ms, ms_to_minutes, Timestamp};

use group::OpenRun;

/// Tolerance band and minimum duration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentationConfig {
    /// Allowed deviation as a fraction of the running average
    grouping_threshold: f64,
    /// Shortest run that counts as an event
    min_duration_ms: u64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        Self {
            grouping_threshold: DEFAULT_GROUPING_THRESHOLD,
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
        }
    }
}

impl SegmentationConfig {
    /// Validated config from a fraction and milliseconds
    pub fn new(grouping_threshold: f64, min_duration_ms: u64) -> ConfigResult<Self> {
        Self::default()
            .with_min_duration_ms(min_duration_ms)
            .with_grouping_threshold(grouping_threshold)
    }

    /// Build from operator-facing units: percent and minutes
    pub fn from_percent_and_minutes(percent: f64, minutes: f64) -> ConfigResult<Self> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(ConfigError::InvalidDuration(minutes));
        }
        Self::new(percent / PERCENT_SCALE, minutes_to_ms(minutes))
            .map_err(|_| ConfigError::InvalidThreshold(percent))
    }

    /// Wide band for noisy analog channels
    pub fn loose() -> Self {
        Self {
            grouping_threshold: LOOSE_GROUPING_THRESHOLD,
            ..Self::default()
        }
    }

    /// Narrow band for stable digital channels
    pub fn tight() -> Self {
        Self {
            grouping_threshold: TIGHT_GROUPING_THRESHOLD,
            ..Self::default()
        }
    }

    /// Replace the threshold, rejecting negative or non-finite fractions
    pub fn with_grouping_threshold(mut self, fraction: f64) -> ConfigResult<Self> {
        if !fraction.is_finite() || fraction < 0.0 {
            return Err(ConfigError::InvalidThreshold(fraction));
        }
        self.grouping_threshold = fraction;
        Ok(self)
    }

    /// Replace the minimum event duration
    pub fn with_min_duration_ms(mut self, min_duration_ms: u64) -> Self {
        self.min_duration_ms = min_duration_ms;
        self
    }

    /// Tolerance band as a fraction of the running average
    pub fn grouping_threshold(&self) -> f64 {
        self.grouping_threshold
    }

    /// Tolerance band in percent
    pub fn threshold_percent(&self) -> f64 {
        self.grouping_threshold * PERCENT_SCALE
    }

    /// Shortest reported event
    pub fn min_duration_ms(&self) -> u64 {
        self.min_duration_ms
    }

    /// Shortest reported event in minutes
    pub fn min_duration_minutes(&self) -> f64 {
        ms_to_minutes(self.min_duration_ms)
    }

    /// Whether a run spanning `start..=end` is long enough
    pub fn is_event(&self, start: Timestamp, end: Timestamp) -> bool {
        duration_ms(start, end) >= self.min_duration_ms
    }
}

/// Runs the segmentation state machine
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    config: SegmentationConfig,
}

impl Segmenter {
    /// Segmenter with these parameters
    pub fn new(config: SegmentationConfig) -> Self {
        Self { config }
    }

    /// Parameters in use
    pub fn config(&self) -> &SegmentationConfig {
        &self.config
    }

    /// Every finalized run, emitted or not.
    ///
    /// `points` is one entry per reading. Missing and non-finite values are
    /// skipped but still count for [`EventGroup::reading_indices`].
    pub fn runs<I>(&self, points: I) -> Runs<I::IntoIter>
    where
        I: IntoIterator<Item = (Timestamp, Option<f64>)>,
    {
        Runs {
            points: points.into_iter().enumerate(),
            open: None,
            threshold: self.config.grouping_threshold,
        }
    }

    /// Runs that last at least the minimum duration
    pub fn events<I>(&self, points: I) -> impl Iterator<Item = EventGroup>
    where
        I: IntoIterator<Item = (Timestamp, Option<f64>)>,
    {
        let config = self.config;
        self.runs(points)
            .filter(move |run| config.is_event(run.start_time, run.end_time))
    }

    /// Collected [`events`](Self::events)
    pub fn segment<I>(&self, points: I) -> Vec<EventGroup>
    where
        I: IntoIterator<Item = (Timestamp, Option<f64>)>,
    {
        self.events(points).collect()
    }
}

/// Iterator over finalized runs
#[derive(Debug)]
pub struct Runs<I> {
    points: std::iter::Enumerate<I>,
    open: Option<OpenRun>,
    threshold: f64,
}

impl<I> Iterator for Runs<I>
where
    I: Iterator<Item = (Timestamp, Option<f64>)>,
{
    type Item = EventGroup;

    fn next(&mut self) -> Option<EventGroup> {
        for (index, (timestamp, value)) in self.points.by_ref() {
            let Some(value) = value.filter(|v| v.is_finite()) else {
                continue;
            };

            if let Some(run) = self.open.as_mut() {
                if run.accepts(value, self.threshold) {
                    run.push(index, timestamp, value);
                    continue;
                }
            }

            let next = OpenRun::start(index, timestamp, value);
            if let Some(finished) = self.open.replace(next) {
                return Some(finished.finish());
            }
        }
        self.open.take().map(OpenRun::finish)
    }
}
