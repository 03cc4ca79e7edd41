//! Readings and enriched readings
//!
//! A [`Reading`] is what a device reported at one instant: two timestamps and
//! an ordered set of sensor channels. Key order matters because sensor
//! discovery (and therefore generated colors) follows the order of the first
//! reading.
//!
//! The catalog builder never touches input readings. Derived channels live
//! next to the reading in an [`EnrichedReading`].

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Ordered sensor-key → nullable value map.
///
/// Devices report a dozen channels at most, so a vector with linear lookup
/// beats hashing and keeps insertion order for free.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorValues {
    entries: Vec<(String, Option<f64>)>,
}

impl SensorValues {
    /// Empty set
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Set a channel, replacing an existing value in place or appending
    pub fn insert(&mut self, key: impl Into<String>, value: Option<f64>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with(mut self, key: impl Into<String>, value: Option<f64>) -> Self {
        self.insert(key, value);
        self
    }

    /// Finite value of a channel.
    ///
    /// Absent keys, explicit nulls and non-finite numbers all read as `None`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| *v)
            .filter(|v| v.is_finite())
    }

    /// Whether the key was reported at all (even as null)
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Raw entries in insertion order, nulls included
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of reported channels
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No channel reported
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<f64>)> for SensorValues {
    fn from_iter<I: IntoIterator<Item = (K, Option<f64>)>>(iter: I) -> Self {
        let mut values = SensorValues::new();
        for (key, value) in iter {
            values.insert(key, value);
        }
        values
    }
}

/// One timestamped observation from one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Device-local capture time
    pub timestamp: Timestamp,
    /// Server/ingest time
    pub received_timestamp: Timestamp,
    /// Reported sensor channels
    pub values: SensorValues,
}

impl Reading {
    /// Reading whose ingest time equals its capture time
    pub fn new(timestamp: Timestamp, values: SensorValues) -> Self {
        Self {
            timestamp,
            received_timestamp: timestamp,
            values,
        }
    }

    /// Set the ingest time
    pub fn with_received(mut self, received_timestamp: Timestamp) -> Self {
        self.received_timestamp = received_timestamp;
        self
    }

    /// Finite value of a channel
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key)
    }

    /// Ingest delay, zero for clock-skewed devices
    pub fn ingest_delay_ms(&self) -> u64 {
        self.received_timestamp.saturating_sub(self.timestamp)
    }
}

/// Input reading plus the channels derived from it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedReading {
    /// Reading exactly as ingested
    pub raw: Reading,
    /// Calibrated weight, probe averages
    pub derived: SensorValues,
}

impl EnrichedReading {
    /// Wrap a reading with no derived channels yet
    pub fn new(raw: Reading) -> Self {
        Self {
            raw,
            derived: SensorValues::new(),
        }
    }

    /// Capture time of the wrapped reading
    pub fn timestamp(&self) -> Timestamp {
        self.raw.timestamp
    }

    /// Channel value, derived channels shadowing raw ones
    pub fn value(&self, key: &str) -> Option<f64> {
        if self.derived.contains_key(key) {
            self.derived.get(key)
        } else {
            self.raw.value(key)
        }
    }
}
