//! Core telemetry pipeline for FleetSense
//!
//! Turns batches of field-device readings into per-device sensor catalogs,
//! calibrates raw load-cell signals and finds the stretches of time where a
//! sensor held steady.
//!
//! Key properties:
//! - No file or network I/O (wire formats live in `fleetsense-schemas`)
//! - Missing values are never read as zero
//! - Single pass, linear time segmentation
//!
//! ```no_run
//! use fleetsense_core::{Batch, DeviceBatch, Fleet, Reading, SensorValues};
//!
//! let readings = (0..10u64)
//!     .map(|i| Reading::new(i * 60_000, SensorValues::new().with("weightRaw", Some(812.0))))
//!     .collect();
//!
//! let mut fleet = Fleet::default();
//! let report = fleet.ingest(Batch::new().with_device("TRUCK-7", DeviceBatch::new(readings)));
//! assert!(report.is_clean());
//!
//! fleet.add_calibration_point(0.0, 0.0)?;
//! fleet.add_calibration_point(1000.0, 24_000.0)?;
//!
//! let events = fleet.analyze_device("TRUCK-7")?;
//! println!("{}", events.summary());
//! # Ok::<(), fleetsense_core::FleetError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

// Macros for optional logging
#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if false {
            let _ = format!($($arg)*);
        }
    };
}

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if false {
            let _ = format!($($arg)*);
        }
    };
}

pub mod calibration;
pub mod catalog;
pub mod constants;
pub mod errors;
pub mod export;
pub mod fleet;
pub mod ingest;
pub mod reading;
pub mod registry;
pub mod segmentation;
pub mod time;

// Public API
pub use calibration::{
    CalibrationCurve, CalibrationSnapshot, CalibrationStore, ControlPoint,
    MemoryCalibrationStore, WeightCalibration, WeightConverter, WeightUnit,
};
pub use catalog::{
    recalibrate, CatalogBuilder, DeviceMetadata, DeviceRecord, SensorFamily, SensorStats, Trend,
};
pub use errors::{
    CalibrationError, CalibrationResult, CatalogError, CatalogResult, ConfigError, ConfigResult,
    ExportError, ExportResult, FleetError, FleetResult,
};
pub use export::ExportTable;
pub use fleet::Fleet;
pub use ingest::{Batch, DateRange, DeviceBatch, DeviceMetadataInput, IngestReport};
pub use reading::{EnrichedReading, Reading, SensorValues};
pub use registry::{Color, SensorDisplay, SensorRegistry};
pub use segmentation::{
    analyze_device, DeviceEvents, EventGroup, Runs, SegmentationConfig, Segmenter, SensorEvents,
};
pub use time::{FixedTime, SystemTime, TimeSource, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    #[deny(unused_variables)]
    fn logging_macros_use_their_arguments() {
        let skipped = CatalogError::empty_device("GPS-009");
        log_warn!("skipping device: {}", skipped);
        let readings = 3;
        log_debug!("built {} readings", readings);
    }
}
