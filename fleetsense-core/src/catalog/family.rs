//! Probe families
//!
//! Devices may carry several probes of the same kind (`temp1`, `temp2`, ...).
//! A family groups them by key prefix and yields one derived channel holding
//! their mean.

use serde::{Deserialize, Serialize};

use crate::constants::sensors::{
    HUMIDITY_AVG_KEY, HUMIDITY_PREFIX, TEMPERATURE_AVG_KEY, TEMPERATURE_PREFIX,
};

/// Prefix-matched group of probes with a derived average channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorFamily {
    /// Key prefix shared by every probe of the family
    pub prefix: String,
    /// Channel holding the mean of the present probes
    pub derived_key: String,
}

impl SensorFamily {
    /// Family matching keys that start with `prefix`
    pub fn new(prefix: impl Into<String>, derived_key: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            derived_key: derived_key.into(),
        }
    }

    /// `temp*` → `temp_avg`
    pub fn temperature() -> Self {
        Self::new(TEMPERATURE_PREFIX, TEMPERATURE_AVG_KEY)
    }

    /// `hum*` → `hum_avg`
    pub fn humidity() -> Self {
        Self::new(HUMIDITY_PREFIX, HUMIDITY_AVG_KEY)
    }

    /// Families every catalog starts with
    pub fn defaults() -> Vec<Self> {
        vec![Self::temperature(), Self::humidity()]
    }

    /// Keys belonging to this family, never including the derived key
    pub fn members<'k>(&self, keys: &'k [String]) -> impl Iterator<Item = &'k str> + 'k {
        let prefix = self.prefix.clone();
        let derived_key = self.derived_key.clone();
        keys.iter()
            .map(String::as_str)
            .filter(move |key| key.starts_with(prefix.as_str()) && *key != derived_key)
    }
}
