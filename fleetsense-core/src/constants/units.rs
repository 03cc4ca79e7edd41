//! Weight Unit Conversion Table
//!
//! The calibration curve is defined in the load cell's native unit
//! (millivolts). Devices may declare their raw weight in another unit; the
//! factors below bring a value into the native unit (multiply) and back out
//! of it into the configured display unit (divide).
//!
//! ```text
//! unit  | symbol | factor to native
//! ------|--------|-----------------
//! mV    | "mV"   | 1
//! kg    | "kg"   | 1     (1 kg ≙ 1 mV on the reference load cell)
//! tons  | "tons" | 1000
//! ```
//!
//! Unknown unit symbols pass through with factor 1.

/// Symbol of the native calibration unit.
pub const NATIVE_WEIGHT_UNIT: &str = "mV";

/// Millivolt factor.
pub const MILLIVOLT_FACTOR: f64 = 1.0;

/// Kilogram factor.
pub const KILOGRAM_FACTOR: f64 = 1.0;

/// Metric ton factor.
pub const TON_FACTOR: f64 = 1000.0;

/// Factor applied to unrecognized units.
pub const PASSTHROUGH_FACTOR: f64 = 1.0;
