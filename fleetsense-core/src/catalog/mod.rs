//! Sensor Catalog Builder
//!
//! ## Overview
//!
//! Turns the raw readings of one device into a [`DeviceRecord`]: the ordered
//! list of available sensors, derived channels and per-sensor statistics.
//!
//! ## Processing Order
//!
//! ```text
//! readings ─→ sort by capture time
//!          ─→ sensor keys from the first reading (minus dtt/dts)
//!          ─→ calibrated weight (only when a converter is configured)
//!          ─→ probe family averages
//!          ─→ registry entries for every key
//!          ─→ statistics for every key with at least one value
//! ```
//!
//! Input readings are never modified. Derived channels are written to each
//! [`EnrichedReading`]'s `derived` map.
//!
//! ## Missing Values
//!
//! A sensor that is absent, null or non-finite on a reading is simply not
//! part of that reading's aggregates. It is never read as zero. A sensor with
//! no value at all stays in the available list but has no statistics.

mod family;
mod stats;

pub use family::SensorFamily;
pub use stats::{SensorStats, Trend};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calibration::{WeightConverter, WeightUnit};
use crate::constants::sensors::{
    DEFAULT_DEVICE_TYPE, DEFAULT_INTERVAL_LABEL, DEFAULT_LOCATION, DEFAULT_SELECTED_SENSORS,
    TIMESTAMP_KEYS, WEIGHT_CALIBRATED_KEY, WEIGHT_RAW_KEY,
};
use crate::errors::{CatalogError, CatalogResult};
use crate::ingest::DeviceBatch;
use crate::reading::EnrichedReading;
use crate::registry::SensorRegistry;
use crate::time::{time_ago, Timestamp};

/// Resolved device metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    /// Unit the raw weight channel is reported in
    pub weight_unit: WeightUnit,
    /// Reported device type or `GPS Device`
    pub device_type: String,
    /// Reported location or `Unknown`
    pub location: String,
    /// Last report time, the ingest time when the device gave none
    pub last_update: Timestamp,
    /// Number of readings
    pub data_points: usize,
    /// Sampling interval label of the batch
    pub interval: String,
}

impl DeviceMetadata {
    /// Relative age of `last_update`, such as `"5m ago"`
    pub fn last_seen(&self, now: Timestamp) -> String {
        time_ago(now, self.last_update)
    }
}

/// Everything known about one device after an ingest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceRecord {
    /// Key of the device in its batch
    pub device_id: String,
    /// Chronological readings with derived channels
    pub readings: Vec<EnrichedReading>,
    /// Resolved metadata
    pub metadata: DeviceMetadata,
    /// Sensor keys in discovery order, derived keys last
    pub sensors: Vec<String>,
    /// Statistics for sensors that have at least one value
    pub stats: BTreeMap<String, SensorStats>,
}

impl DeviceRecord {
    /// Whether `key` is in the available sensor list
    pub fn has_sensor(&self, key: &str) -> bool {
        self.sensors.iter().any(|s| s == key)
    }

    /// Statistics of `key`, `None` when it never had a value
    pub fn stats(&self, key: &str) -> Option<&SensorStats> {
        self.stats.get(key)
    }

    /// `(timestamp, value)` for every reading, `None` where the sensor is missing
    pub fn series<'a>(
        &'a self,
        key: &'a str,
    ) -> impl Iterator<Item = (Timestamp, Option<f64>)> + 'a {
        self.readings.iter().map(move |r| (r.timestamp(), r.value(key)))
    }

    /// Sensors charted when the device is first shown
    pub fn default_selection(&self) -> &[String] {
        &self.sensors[..self.sensors.len().min(DEFAULT_SELECTED_SENSORS)]
    }

    /// Capture time of the first and last reading
    pub fn time_span(&self) -> Option<(Timestamp, Timestamp)> {
        Some((self.readings.first()?.timestamp(), self.readings.last()?.timestamp()))
    }

    fn refresh_stats(&mut self, key: &str, unit: &str) {
        let values: Vec<f64> = self.readings.iter().filter_map(|r| r.value(key)).collect();
        match SensorStats::compute(values, unit) {
            Some(stats) => {
                self.stats.insert(key.to_string(), stats);
            }
            None => {
                self.stats.remove(key);
            }
        }
    }
}

/// Builds [`DeviceRecord`]s, growing the shared registry as it goes
pub struct CatalogBuilder<'a> {
    registry: &'a mut SensorRegistry,
    converter: Option<&'a dyn WeightConverter>,
    families: Vec<SensorFamily>,
    now: Timestamp,
    interval: Option<String>,
}

impl<'a> CatalogBuilder<'a> {
    /// Builder without calibration and with the default probe families
    pub fn new(registry: &'a mut SensorRegistry) -> Self {
        Self {
            registry,
            converter: None,
            families: SensorFamily::defaults(),
            now: 0,
            interval: None,
        }
    }

    /// Compute calibrated weight with this converter
    pub fn with_converter(mut self, converter: &'a dyn WeightConverter) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Replace the default probe families
    pub fn with_families(mut self, families: Vec<SensorFamily>) -> Self {
        self.families = families;
        self
    }

    /// Fallback `last_update` for devices that do not report one
    pub fn with_now(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    /// Interval label copied into every record's metadata
    pub fn with_interval(mut self, interval: Option<String>) -> Self {
        self.interval = interval;
        self
    }

    /// Build the record for one device.
    ///
    /// Fails only when the device has no readings.
    pub fn build(&mut self, device_id: &str, batch: DeviceBatch) -> CatalogResult<DeviceRecord> {
        let DeviceBatch {
            mut readings,
            last_update,
            metadata,
        } = batch;

        if readings.is_empty() {
            return Err(CatalogError::empty_device(device_id));
        }
        readings.sort_by_key(|r| r.timestamp);

        let weight_unit = metadata.weight_unit.unwrap_or_default();
        let mut sensors: Vec<String> = readings[0]
            .values
            .keys()
            .filter(|key| !TIMESTAMP_KEYS.contains(key))
            .map(str::to_string)
            .collect();
        let mut enriched: Vec<EnrichedReading> =
            readings.into_iter().map(EnrichedReading::new).collect();

        if let Some(converter) = self.converter {
            if sensors.iter().any(|s| s == WEIGHT_RAW_KEY) {
                apply_calibration(&mut enriched, converter, &weight_unit);
                if !sensors.iter().any(|s| s == WEIGHT_CALIBRATED_KEY) {
                    sensors.push(WEIGHT_CALIBRATED_KEY.to_string());
                }
                self.registry
                    .set_unit(WEIGHT_CALIBRATED_KEY, converter.target_unit().symbol());
            }
        }

        for family in &self.families {
            let members: Vec<String> = family.members(&sensors).map(str::to_string).collect();
            if members.len() < 2 {
                continue;
            }
            for reading in &mut enriched {
                let present: Vec<f64> = members.iter().filter_map(|m| reading.value(m)).collect();
                if let Some(avg) = stats::mean(&present) {
                    reading.derived.insert(family.derived_key.clone(), Some(avg));
                }
            }
            if !sensors.contains(&family.derived_key) {
                sensors.push(family.derived_key.clone());
            }
        }

        for (index, key) in sensors.iter().enumerate() {
            self.registry.ensure(key, index);
        }

        let data_points = enriched.len();
        let mut record = DeviceRecord {
            device_id: device_id.to_string(),
            readings: enriched,
            metadata: DeviceMetadata {
                weight_unit,
                device_type: metadata
                    .device_type
                    .unwrap_or_else(|| DEFAULT_DEVICE_TYPE.to_string()),
                location: metadata.location.unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
                last_update: last_update.unwrap_or(self.now),
                data_points,
                interval: self
                    .interval
                    .clone()
                    .unwrap_or_else(|| DEFAULT_INTERVAL_LABEL.to_string()),
            },
            sensors: Vec::new(),
            stats: BTreeMap::new(),
        };

        for key in &sensors {
            record.refresh_stats(key, self.registry.unit(key));
        }
        record.sensors = sensors;

        log_debug!(
            "Catalog built for {}: {} readings, {} sensors, {} with stats",
            device_id,
            record.readings.len(),
            record.sensors.len(),
            record.stats.len()
        );
        Ok(record)
    }
}

/// Rebuild only the calibrated weight channel of a record.
///
/// Every other derived channel and statistic is carried over untouched. A
/// record without a raw weight channel comes back unchanged.
pub fn recalibrate(
    record: &DeviceRecord,
    converter: &dyn WeightConverter,
    registry: &mut SensorRegistry,
) -> DeviceRecord {
    let mut updated = record.clone();
    if !updated.has_sensor(WEIGHT_RAW_KEY) {
        return updated;
    }

    apply_calibration(&mut updated.readings, converter, &record.metadata.weight_unit);
    if !updated.has_sensor(WEIGHT_CALIBRATED_KEY) {
        updated.sensors.push(WEIGHT_CALIBRATED_KEY.to_string());
        registry.ensure(WEIGHT_CALIBRATED_KEY, updated.sensors.len() - 1);
    }

    let unit = converter.target_unit().symbol();
    registry.set_unit(WEIGHT_CALIBRATED_KEY, unit);
    updated.refresh_stats(WEIGHT_CALIBRATED_KEY, unit);

    log_debug!("Recalibrated {}", record.device_id);
    updated
}

/// Write the calibrated weight of every reading.
///
/// Readings without a raw weight get an explicit null so a stale calibrated
/// value reported by the device never shows through.
fn apply_calibration(
    readings: &mut [EnrichedReading],
    converter: &dyn WeightConverter,
    source_unit: &WeightUnit,
) {
    for reading in readings {
        let calibrated = reading
            .raw
            .value(WEIGHT_RAW_KEY)
            .map(|raw| converter.convert_weight(raw, source_unit))
            .filter(|v| v.is_finite());
        reading.derived.insert(WEIGHT_CALIBRATED_KEY, calibrated);
    }
}
