//! Constants for FleetSense Core
//!
//! Centralized, documented constants used throughout the pipeline. Every
//! magic number lives here together with its unit.
//!
//! ## Organization
//!
//! - **Sensors**: reserved keys, probe families, display defaults
//! - **Units**: weight unit conversion factors
//! - **Segmentation**: event detection defaults and presets
//! - **Time**: time unit conversions

/// Reserved sensor keys, probe families and display defaults.
pub mod sensors;

/// Weight unit conversion factors.
pub mod units;

/// Event segmentation defaults.
pub mod segmentation;

/// Time unit conversions.
pub mod time;

pub use sensors::{
    CAPTURE_TIME_KEY, RECEIVED_TIME_KEY, WEIGHT_RAW_KEY, WEIGHT_CALIBRATED_KEY,
    TEMPERATURE_AVG_KEY, HUMIDITY_AVG_KEY,
};

pub use segmentation::{DEFAULT_GROUPING_THRESHOLD, DEFAULT_MIN_DURATION_MS};

pub use time::{MS_PER_SECOND, MS_PER_MINUTE};

pub use units::NATIVE_WEIGHT_UNIT;
