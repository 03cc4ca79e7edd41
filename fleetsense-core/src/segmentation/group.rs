//! Event groups

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::time::{duration_ms, format_iso8601, ms_to_minutes, Timestamp};

/// Contiguous run of values that stayed within the tolerance band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventGroup {
    /// Capture time of the first member
    pub start_time: Timestamp,
    /// Capture time of the last member
    pub end_time: Timestamp,
    /// Member values in order
    pub values: Vec<f64>,
    /// Position of each member in the reading sequence it came from
    pub reading_indices: Vec<usize>,
    /// Smallest member value
    pub min: f64,
    /// Largest member value
    pub max: f64,
    /// Mean of all members
    pub avg: f64,
}

impl EventGroup {
    /// Milliseconds from first to last member
    pub fn duration_ms(&self) -> u64 {
        duration_ms(self.start_time, self.end_time)
    }

    /// Duration in fractional minutes
    pub fn duration_minutes(&self) -> f64 {
        ms_to_minutes(self.duration_ms())
    }

    /// Number of member values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// No members
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Human-readable description, `number` is 1-based
    ///
    /// ```text
    /// Event 1: 10.00 - 10.30 kg
    /// Duration: 3.0 minutes
    /// Time: 1970-01-01T00:00:00.000Z to 1970-01-01T00:03:00.000Z
    /// Average: 10.15 kg
    /// Data Points: 4
    /// ```
    pub fn summary(&self, number: usize, unit: &str) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = writeln!(out, "Event {number}: {:.2} - {:.2} {unit}", self.min, self.max);
        let _ = writeln!(out, "Duration: {:.1} minutes", self.duration_minutes());
        let _ = writeln!(
            out,
            "Time: {} to {}",
            format_iso8601(self.start_time),
            format_iso8601(self.end_time)
        );
        let _ = writeln!(out, "Average: {:.2} {unit}", self.avg);
        let _ = write!(out, "Data Points: {}", self.len());
        out
    }
}

/// Run under construction
#[derive(Debug)]
pub(super) struct OpenRun {
    start_time: Timestamp,
    end_time: Timestamp,
    values: Vec<f64>,
    reading_indices: Vec<usize>,
    min: f64,
    max: f64,
    sum: f64,
}

impl OpenRun {
    pub(super) fn start(index: usize, timestamp: Timestamp, value: f64) -> Self {
        Self {
            start_time: timestamp,
            end_time: timestamp,
            values: vec![value],
            reading_indices: vec![index],
            min: value,
            max: value,
            sum: value,
        }
    }

    pub(super) fn avg(&self) -> f64 {
        self.sum / self.values.len() as f64
    }

    /// Whether `value` lies within `fraction × avg` of the running average
    pub(super) fn accepts(&self, value: f64, fraction: f64) -> bool {
        let avg = self.avg();
        (value - avg).abs() <= avg * fraction
    }

    pub(super) fn push(&mut self, index: usize, timestamp: Timestamp, value: f64) {
        self.end_time = timestamp;
        self.values.push(value);
        self.reading_indices.push(index);
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.sum += value;
    }

    pub(super) fn finish(self) -> EventGroup {
        let avg = self.avg();
        EventGroup {
            start_time: self.start_time,
            end_time: self.end_time,
            values: self.values,
            reading_indices: self.reading_indices,
            min: self.min,
            max: self.max,
            avg,
        }
    }
}
