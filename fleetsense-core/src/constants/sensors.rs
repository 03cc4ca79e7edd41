//! Sensor Keys and Display Defaults
//!
//! Field devices report a flat object per point. Two keys carry time, the
//! rest are sensor channels. This module names the keys the pipeline treats
//! specially and the display defaults for the channels a standard tracker
//! reports.

// ===== TIMESTAMP KEYS =====

/// Device-local capture time (milliseconds).
pub const CAPTURE_TIME_KEY: &str = "dtt";

/// Server/ingest time (milliseconds).
pub const RECEIVED_TIME_KEY: &str = "dts";

/// Keys that are never treated as sensor channels.
pub const TIMESTAMP_KEYS: [&str; 2] = [CAPTURE_TIME_KEY, RECEIVED_TIME_KEY];

// ===== WEIGHT CHANNELS =====

/// Raw analog load-cell signal.
pub const WEIGHT_RAW_KEY: &str = "weightRaw";

/// Derived channel holding the calibrated weight.
pub const WEIGHT_CALIBRATED_KEY: &str = "weightCalibrated";

// ===== PROBE FAMILIES =====

/// Temperature probes share this prefix (`temp1`, `temp2`, ...).
pub const TEMPERATURE_PREFIX: &str = "temp";

/// Derived mean of all temperature probes.
pub const TEMPERATURE_AVG_KEY: &str = "temp_avg";

/// Humidity probes share this prefix (`hum1`, `hum2`, ...).
pub const HUMIDITY_PREFIX: &str = "hum";

/// Derived mean of all humidity probes.
pub const HUMIDITY_AVG_KEY: &str = "hum_avg";

// ===== GENERATED COLORS =====

/// Hue step between consecutively discovered sensors (degrees).
///
/// 137° is close to the golden angle, so neighbouring sensors land far apart
/// on the color wheel even after many wraps.
pub const GENERATED_HUE_STEP_DEG: u32 = 137;

/// Saturation of generated colors (%).
pub const GENERATED_SATURATION_PCT: u8 = 70;

/// Lightness of generated colors (%).
pub const GENERATED_LIGHTNESS_PCT: u8 = 60;

/// Color used when a sensor has no registry entry at all.
pub const FALLBACK_COLOR: &str = "#666666";

// ===== KNOWN CHANNELS =====

/// Display defaults for the channels a standard tracker reports.
///
/// Columns: key, color, unit, human-readable name.
pub const KNOWN_SENSORS: [(&str, &str, &str, &str); 13] = [
    ("acc", "#FF6384", "g", "Acceleration"),
    ("spd", "#36A2EB", "km/h", "Speed"),
    ("vBattery", "#FFCE56", "V", "Battery Voltage"),
    ("dBattery", "#4BC0C0", "%", "Battery Percentage"),
    (WEIGHT_RAW_KEY, "#9966FF", "V", "Weight Raw"),
    (WEIGHT_CALIBRATED_KEY, "#FF9F40", "kg", "Weight Calibrated"),
    ("temp1", "#FF6384", "°C", "Temperature 1"),
    ("temp2", "#36A2EB", "°C", "Temperature 2"),
    (TEMPERATURE_AVG_KEY, "#FF3333", "°C", "Temperature Average"),
    ("hum1", "#4BC0C0", "%", "Humidity 1"),
    ("hum2", "#9966FF", "%", "Humidity 2"),
    (HUMIDITY_AVG_KEY, "#33CCFF", "%", "Humidity Average"),
    ("fuelLevel", "#9C27B0", "%", "Fuel Level"),
];

// ===== METADATA DEFAULTS =====

/// Device type assumed when the batch metadata omits it.
pub const DEFAULT_DEVICE_TYPE: &str = "GPS Device";

/// Location assumed when the batch metadata omits it.
pub const DEFAULT_LOCATION: &str = "Unknown";

/// Interval label shown when the batch has no date descriptor.
pub const DEFAULT_INTERVAL_LABEL: &str = "N/A";

// ===== TREND DETECTION =====

/// Number of most recent values compared against the preceding window.
pub const TREND_WINDOW: usize = 5;

/// Relative rise of the recent window that counts as an upward trend.
pub const TREND_UP_RATIO: f64 = 1.05;

/// Relative drop of the recent window that counts as a downward trend.
pub const TREND_DOWN_RATIO: f64 = 0.95;

// ===== SELECTION =====

/// Sensors selected for charting and export when a device is first loaded.
pub const DEFAULT_SELECTED_SENSORS: usize = 4;
