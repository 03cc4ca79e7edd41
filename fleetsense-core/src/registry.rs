//! Sensor display registry
//!
//! Every sensor key gets a color, a unit and a human-readable name so that
//! any channel a device reports can be charted and exported. The registry
//! starts from the defaults in [`constants::sensors::KNOWN_SENSORS`] and
//! grows as new keys are discovered.
//!
//! Update rule: generated entries are append-only. Once a key has a color,
//! unit or name, discovery never changes it. The one exception is the
//! calibrated weight unit, which follows the calibration target unit via
//! [`SensorRegistry::set_unit`].
//!
//! [`constants::sensors::KNOWN_SENSORS`]: crate::constants::sensors::KNOWN_SENSORS

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::sensors::{
    FALLBACK_COLOR, GENERATED_HUE_STEP_DEG, GENERATED_LIGHTNESS_PCT, GENERATED_SATURATION_PCT,
    KNOWN_SENSORS,
};

/// Display color for a sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Color {
    /// CSS hex string such as `#FF6384`
    Hex(String),
    /// Generated HSL color
    Hsl {
        /// Degrees, 0..360
        hue: u16,
        /// Percent
        saturation: u8,
        /// Percent
        lightness: u8,
    },
}

impl Color {
    /// Color for the sensor discovered at `index` (0-based).
    pub fn generated(index: usize) -> Self {
        let hue = (index as u64 * GENERATED_HUE_STEP_DEG as u64 % 360) as u16;
        Color::Hsl {
            hue,
            saturation: GENERATED_SATURATION_PCT,
            lightness: GENERATED_LIGHTNESS_PCT,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Hex(hex) => f.write_str(hex),
            Color::Hsl { hue, saturation, lightness } => {
                write!(f, "hsl({hue}, {saturation}%, {lightness}%)")
            }
        }
    }
}

/// Resolved display attributes of one sensor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorDisplay {
    /// Chart color
    pub color: Color,
    /// Unit symbol, empty when unitless
    pub unit: String,
    /// Human-readable name
    pub name: String,
}

/// Color/unit/name registry shared by every device of a session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorRegistry {
    colors: HashMap<String, Color>,
    units: HashMap<String, String>,
    names: HashMap<String, String>,
}

impl SensorRegistry {
    /// Empty registry (no defaults)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the standard tracker channels
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        for (key, color, unit, name) in KNOWN_SENSORS {
            registry.colors.insert(key.to_string(), Color::Hex(color.to_string()));
            registry.units.insert(key.to_string(), unit.to_string());
            registry.names.insert(key.to_string(), name.to_string());
        }
        registry
    }

    /// Fill any missing color/unit/name for `key`.
    ///
    /// `discovery_index` is the key's position in its device's sensor list
    /// and seeds the generated hue. Returns `true` if anything was added.
    pub fn ensure(&mut self, key: &str, discovery_index: usize) -> bool {
        let mut added = false;
        if !self.colors.contains_key(key) {
            self.colors.insert(key.to_string(), Color::generated(discovery_index));
            added = true;
        }
        if !self.units.contains_key(key) {
            self.units.insert(key.to_string(), String::new());
            added = true;
        }
        if !self.names.contains_key(key) {
            self.names.insert(key.to_string(), default_name(key));
            added = true;
        }
        added
    }

    /// Override the unit of a sensor
    pub fn set_unit(&mut self, key: &str, unit: impl Into<String>) {
        self.units.insert(key.to_string(), unit.into());
    }

    /// Registered color of `key`
    pub fn color(&self, key: &str) -> Option<&Color> {
        self.colors.get(key)
    }

    /// Unit symbol, empty when unknown
    pub fn unit(&self, key: &str) -> &str {
        self.units.get(key).map(String::as_str).unwrap_or("")
    }

    /// Display name, the raw key when unknown
    pub fn name<'a>(&'a self, key: &'a str) -> &'a str {
        self.names.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Display attributes with fallbacks for unregistered keys
    pub fn display(&self, key: &str) -> SensorDisplay {
        SensorDisplay {
            color: self
                .color(key)
                .cloned()
                .unwrap_or_else(|| Color::Hex(FALLBACK_COLOR.to_string())),
            unit: self.unit(key).to_string(),
            name: self.name(key).to_string(),
        }
    }

    /// Whether the key has every display attribute
    pub fn is_registered(&self, key: &str) -> bool {
        self.colors.contains_key(key) && self.units.contains_key(key) && self.names.contains_key(key)
    }
}

/// Key with its first character upper-cased
fn default_name(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
