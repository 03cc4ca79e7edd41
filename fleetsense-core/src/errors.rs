//! Error Types for the Telemetry Pipeline
//!
//! ## Design Philosophy
//!
//! Nothing in the pipeline is fatal. The worst outcome for a device is an
//! empty sensor set or an empty event list, which consumers render as
//! "nothing to show". Errors therefore describe what was skipped and why,
//! so callers can surface a warning and carry on.
//!
//! ## Error Categories
//!
//! ### Input Problems
//! - `CatalogError::MalformedBatch`: empty device list or a device with zero
//!   readings. The device is skipped, the rest of the batch is processed.
//!
//! ### Calibration Editing
//! - `CalibrationError::PointIndexOutOfRange`: update/remove of a control
//!   point that does not exist
//! - `CalibrationError::NonFinitePoint`: NaN or infinite control point values
//! - `CalibrationError::Store`: persistence backend refused the write
//!
//! ### Configuration
//! - `ConfigError`: segmentation parameters that are negative or not finite
//!
//! ### Conditions that are *not* errors
//! - Fewer than two control points: the curve is the identity mapping
//! - Two control points sharing a raw value: guarded step, never a division
//! - A sensor missing on a reading: excluded from aggregates, never zero
//!
//! ## Error Handling Strategy
//!
//! ```rust
//! use fleetsense_core::{Fleet, FleetError, CalibrationError};
//!
//! let mut fleet = Fleet::default();
//! match fleet.remove_calibration_point(3) {
//!     Ok(_) => {}
//!     Err(FleetError::Calibration(CalibrationError::PointIndexOutOfRange { .. })) => {
//!         // Stale UI row - refresh the point list
//!     }
//!     Err(_) => {}
//! }
//! ```

use thiserror::Error;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Result type for calibration editing
pub type CalibrationResult<T> = Result<T, CalibrationError>;

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Result type for fleet-level operations
pub type FleetResult<T> = Result<T, FleetError>;

/// Problems with the shape of an ingested batch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Batch or device carried nothing usable
    #[error("Malformed batch{}: {reason}", device_label(.device_id))]
    MalformedBatch {
        /// Device the problem belongs to, `None` for batch-level problems
        device_id: Option<String>,
        /// Short description of what was missing
        reason: &'static str,
    },
}

impl CatalogError {
    /// Device with no readings
    pub fn empty_device(device_id: &str) -> Self {
        Self::MalformedBatch {
            device_id: Some(device_id.to_string()),
            reason: "device has no readings",
        }
    }

    /// Batch with no devices at all
    pub fn empty_batch() -> Self {
        Self::MalformedBatch {
            device_id: None,
            reason: "batch contains no devices",
        }
    }

    /// Device this error refers to, if any
    pub fn device_id(&self) -> Option<&str> {
        match self {
            Self::MalformedBatch { device_id, .. } => device_id.as_deref(),
        }
    }
}

fn device_label(device_id: &Option<String>) -> String {
    device_id
        .as_ref()
        .map(|id| format!(" (device {id})"))
        .unwrap_or_default()
}

/// Failures while editing calibration state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// Point index does not exist
    #[error("Calibration point {index} out of range (have {len})")]
    PointIndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of points currently configured
        len: usize,
    },

    /// Control points must be finite numbers
    #[error("Calibration point ({raw}, {calibrated}) is not finite")]
    NonFinitePoint {
        /// Raw signal value
        raw: f64,
        /// Calibrated value
        calibrated: f64,
    },

    /// Persistence backend failed
    #[error("Calibration store failed: {0}")]
    Store(String),
}

/// Invalid segmentation parameters
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// Grouping threshold must be a finite, non-negative fraction
    #[error("Grouping threshold {0} must be finite and non-negative")]
    InvalidThreshold(f64),

    /// Minimum duration must be a finite, non-negative number of minutes
    #[error("Minimum duration {0} min must be finite and non-negative")]
    InvalidDuration(f64),
}

/// Failures while producing export output
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV encoder failed
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    /// Underlying writer failed
    #[error("Export I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from fleet-level operations
#[derive(Error, Debug)]
pub enum FleetError {
    /// No record for the requested device
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// Calibration edit rejected
    #[error(transparent)]
    Calibration(#[from] CalibrationError),

    /// Segmentation parameters rejected
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Export failed
    #[error(transparent)]
    Export(#[from] ExportError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_batch_messages() {
        let err = CatalogError::empty_device("GPS-002");
        assert_eq!(err.to_string(), "Malformed batch (device GPS-002): device has no readings");
        assert_eq!(err.device_id(), Some("GPS-002"));

        let err = CatalogError::empty_batch();
        assert_eq!(err.to_string(), "Malformed batch: batch contains no devices");
        assert_eq!(err.device_id(), None);
    }

    #[test]
    fn calibration_errors_wrap_into_fleet_errors() {
        let err: FleetError = CalibrationError::PointIndexOutOfRange { index: 4, len: 2 }.into();
        assert_eq!(err.to_string(), "Calibration point 4 out of range (have 2)");
    }
}
