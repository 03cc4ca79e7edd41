//! JSON Wire Formats for FleetSense
//!
//! ## Overview
//!
//! `fleetsense-core` is transform-in/transform-out and never touches a file.
//! This crate is the edge where bytes become typed values and back:
//!
//! - **Batch documents**: the device dump a tracker backend exports
//! - **Calibration documents**: control points plus target unit, stored as a
//!   JSON file and rewritten on every edit
//! - **Settings documents**: segmentation thresholds in operator units
//! - **CSV export files**: one file per device and day
//!
//! ## Batch Document
//!
//! ```json
//! {
//!   "date": { "from": "2024-03-01 00:00", "to": "2024-03-02 00:00", "interval": "1m" },
//!   "devices": {
//!     "TRUCK-7": {
//!       "lastUpdate": 1709251200000,
//!       "metadata": { "weightUnit": "mV", "deviceType": "Truck", "location": "Depot" },
//!       "points": [
//!         { "dtt": 1709251140000, "dts": 1709251141500, "spd": 0, "weightRaw": 812.4 }
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! Device order and key order inside each point are kept as written. The
//! first point's keys decide which sensors a device has.
//!
//! ## Leniency
//!
//! Field data is messy. Decoding never fails because of one bad point:
//! - Non-numeric sensor values (strings, booleans) decode as missing
//! - Points without a numeric `dtt` are dropped and reported
//! - A missing `dts` defaults to `dtt`
//!
//! Only a document that is not JSON, or whose top level has the wrong shape,
//! is an error.
//!
//! ## Usage Example
//!
//! ```rust
//! use fleetsense_core::Fleet;
//! use fleetsense_schemas::parse_batch;
//!
//! let json = r#"{
//!     "devices": {
//!         "TRUCK-7": { "points": [ { "dtt": 0, "weightRaw": 812.4 }, { "dts": 5 } ] }
//!     }
//! }"#;
//!
//! let decoded = parse_batch(json)?;
//! assert_eq!(decoded.warnings.len(), 1);
//!
//! let mut fleet = Fleet::default();
//! let report = fleet.ingest(decoded.batch);
//! assert_eq!(report.accepted, ["TRUCK-7"]);
//! # Ok::<(), fleetsense_schemas::SchemaError>(())
//! ```

use std::path::PathBuf;

use fleetsense_core::{ConfigError, ExportError, FleetError};
use thiserror::Error;

pub mod batch;
pub mod calibration;
pub mod export;
pub mod settings;

pub use batch::{decode_batch, parse_batch, read_batch, DecodedBatch, PointWarning};
pub use calibration::{CalibrationDocument, JsonFileStore};
pub use export::{preview_table, write_device_csv};
pub use settings::Settings;

/// Result type for wire-format operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Wire-format errors
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Document is not valid JSON or has the wrong shape
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    /// File could not be read or written
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Settings hold values the pipeline rejects
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Fleet operation failed
    #[error(transparent)]
    Fleet(#[from] FleetError),

    /// CSV rendering failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SchemaError::Io {
            path: path.into(),
            source,
        }
    }
}
