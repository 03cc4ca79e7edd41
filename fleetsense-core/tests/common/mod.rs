//! Common test utilities for integration tests
//!
//! This module provides:
//! - Deterministic telemetry generators (plateaus, probe pairs)
//! - The reference scenarios used across test files
//! - Small assertion helpers for event groups

#![allow(dead_code)]

pub mod generators;
pub mod scenarios;

use fleetsense_core::{EventGroup, Timestamp};

/// One minute in milliseconds
pub const MINUTE: Timestamp = 60_000;

/// `(timestamp, value)` pairs at one-minute spacing starting at zero
pub fn minute_series(values: &[f64]) -> Vec<(Timestamp, Option<f64>)> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as Timestamp * MINUTE, Some(*v)))
        .collect()
}

/// Values of every group concatenated in order
pub fn flatten_groups(groups: &[EventGroup]) -> Vec<f64> {
    groups.iter().flat_map(|g| g.values.iter().copied()).collect()
}

/// Panics unless groups are ordered by start time and do not overlap
pub fn assert_non_overlapping(groups: &[EventGroup]) {
    for pair in groups.windows(2) {
        assert!(
            pair[0].end_time <= pair[1].start_time,
            "groups overlap: {}..{} and {}..{}",
            pair[0].start_time,
            pair[0].end_time,
            pair[1].start_time,
            pair[1].end_time
        );
        assert!(
            pair[0].reading_indices.last() < pair[1].reading_indices.first(),
            "reading indices overlap"
        );
    }
}
