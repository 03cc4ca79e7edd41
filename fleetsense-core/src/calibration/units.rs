//! Weight units

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::units::{
    KILOGRAM_FACTOR, MILLIVOLT_FACTOR, NATIVE_WEIGHT_UNIT, PASSTHROUGH_FACTOR, TON_FACTOR,
};

/// Unit a weight value is expressed in.
///
/// Serialized as its symbol. Unrecognized symbols are kept verbatim and
/// convert with factor 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WeightUnit {
    /// Native load-cell signal
    #[default]
    MilliVolt,
    /// Kilograms
    Kilogram,
    /// Metric tons
    Ton,
    /// Unrecognized symbol, passed through with factor 1
    Other(String),
}

impl WeightUnit {
    /// Multiplier into the native unit
    pub fn factor(&self) -> f64 {
        match self {
            WeightUnit::MilliVolt => MILLIVOLT_FACTOR,
            WeightUnit::Kilogram => KILOGRAM_FACTOR,
            WeightUnit::Ton => TON_FACTOR,
            WeightUnit::Other(_) => PASSTHROUGH_FACTOR,
        }
    }

    /// Display symbol: `mV`, `kg`, `tons` or the raw text
    pub fn symbol(&self) -> &str {
        match self {
            WeightUnit::MilliVolt => NATIVE_WEIGHT_UNIT,
            WeightUnit::Kilogram => "kg",
            WeightUnit::Ton => "tons",
            WeightUnit::Other(symbol) => symbol,
        }
    }

    /// Value in this unit expressed in the native unit
    pub fn to_native(&self, value: f64) -> f64 {
        value * self.factor()
    }

    /// Native-unit value expressed in this unit
    pub fn from_native(&self, value: f64) -> f64 {
        value / self.factor()
    }
}

impl FromStr for WeightUnit {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "mV" => WeightUnit::MilliVolt,
            "kg" => WeightUnit::Kilogram,
            "tons" => WeightUnit::Ton,
            other => WeightUnit::Other(other.to_string()),
        })
    }
}

impl From<&str> for WeightUnit {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(unit) => unit,
            Err(never) => match never {},
        }
    }
}

impl From<String> for WeightUnit {
    fn from(s: String) -> Self {
        WeightUnit::from(s.as_str())
    }
}

impl From<WeightUnit> for String {
    fn from(unit: WeightUnit) -> Self {
        unit.symbol().to_string()
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
