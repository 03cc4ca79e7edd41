//! Batch input types
//!
//! A batch is the complete dump of one export window: every device with its
//! readings and a date descriptor. Decoding from the wire happens in
//! `fleetsense-schemas`; these are the already-typed values the pipeline
//! consumes.

use serde::{Deserialize, Serialize};

use crate::calibration::WeightUnit;
use crate::errors::CatalogError;
use crate::reading::Reading;
use crate::time::Timestamp;

/// Optional per-device metadata as reported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMetadataInput {
    /// Unit of the raw weight channel, `mV` when absent
    pub weight_unit: Option<WeightUnit>,
    /// Device kind, such as `Truck`
    pub device_type: Option<String>,
    /// Last known site
    pub location: Option<String>,
}

/// Readings of one device plus what the device said about itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceBatch {
    /// Chronological readings
    pub readings: Vec<Reading>,
    /// Last time the device reported, if known
    pub last_update: Option<Timestamp>,
    /// Self-reported metadata
    pub metadata: DeviceMetadataInput,
}

impl DeviceBatch {
    /// Readings without metadata
    pub fn new(readings: Vec<Reading>) -> Self {
        Self {
            readings,
            ..Self::default()
        }
    }

    /// Declare the unit of the raw weight channel
    pub fn with_weight_unit(mut self, unit: WeightUnit) -> Self {
        self.metadata.weight_unit = Some(unit);
        self
    }

    /// Declare the last report time
    pub fn with_last_update(mut self, last_update: Timestamp) -> Self {
        self.last_update = Some(last_update);
        self
    }
}

/// Export window descriptor, display only
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// Window start label
    pub from: Option<String>,
    /// Window end label
    pub to: Option<String>,
    /// Sampling interval label such as `"1m"`
    pub interval: Option<String>,
}

/// One ingest unit: devices in document order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Devices keyed by id, in document order
    pub devices: Vec<(String, DeviceBatch)>,
    /// Export window
    pub date: DateRange,
}

impl Batch {
    /// Batch with no devices
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a device
    pub fn with_device(mut self, device_id: impl Into<String>, device: DeviceBatch) -> Self {
        self.devices.push((device_id.into(), device));
        self
    }

    /// Set the export window
    pub fn with_date(mut self, date: DateRange) -> Self {
        self.date = date;
        self
    }

    /// No devices at all
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

/// What an ingest did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    /// Devices that produced a record, in batch order
    pub accepted: Vec<String>,
    /// Devices or batch-level problems that were skipped
    pub warnings: Vec<CatalogError>,
}

impl IngestReport {
    /// Nothing was skipped
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Devices skipped because of a problem
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.warnings.iter().filter_map(CatalogError::device_id)
    }
}
