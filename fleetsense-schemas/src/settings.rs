//! Operator settings document
//!
//! Thresholds are stored the way operators type them: percent and minutes.
//! Every field has a default, so `{}` is a valid settings file.

use std::fs;
use std::path::Path;

use fleetsense_core::constants::segmentation::{
    DEFAULT_GROUPING_THRESHOLD, DEFAULT_MIN_DURATION_MINUTES, PERCENT_SCALE,
};
use fleetsense_core::{Fleet, SegmentationConfig};
use serde::{Deserialize, Serialize};

use crate::{SchemaError, SchemaResult};

/// Rows shown in a table preview
pub const DEFAULT_PREVIEW_ROWS: usize = 100;

/// Thresholds and display limits in operator units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Tolerance band around the running average, in percent
    pub grouping_threshold_percent: f64,
    /// Shortest run reported as an event, in minutes
    pub min_duration_minutes: f64,
    /// Rows kept by table previews
    pub preview_rows: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grouping_threshold_percent: DEFAULT_GROUPING_THRESHOLD * PERCENT_SCALE,
            min_duration_minutes: DEFAULT_MIN_DURATION_MINUTES as f64,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Settings {
    /// Validated segmentation parameters
    pub fn to_segmentation_config(&self) -> SchemaResult<SegmentationConfig> {
        Ok(SegmentationConfig::from_percent_and_minutes(
            self.grouping_threshold_percent,
            self.min_duration_minutes,
        )?)
    }

    /// Push the thresholds into `fleet`, leaving it untouched on error
    pub fn apply(&self, fleet: &mut Fleet) -> SchemaResult<()> {
        fleet.set_segmentation(self.to_segmentation_config()?);
        Ok(())
    }

    /// Parse and validate
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.to_segmentation_config()?;
        Ok(settings)
    }

    /// Load from `path`, defaults when the file does not exist
    pub fn load(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(json) => Self::from_json(&json),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(SchemaError::io(path, e)),
        }
    }

    /// Write as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> SchemaResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SchemaError::io(path, e))
    }
}
