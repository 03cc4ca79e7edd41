//! Calibration documents and the JSON file store
//!
//! ## Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "weightUnit": "tons",
//!   "points": [ { "raw": 0, "calibrated": 0 }, { "raw": 1000, "calibrated": 24 } ]
//! }
//! ```
//!
//! Older dashboards stored only the bare points array. Such a file still
//! loads, with the target unit defaulting to `mV`.
//!
//! Saves write a sibling temp file first and rename it over the target, so
//! a crash mid-save leaves the previous calibration intact.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use fleetsense_core::{
    CalibrationError, CalibrationResult, CalibrationSnapshot, CalibrationStore, ControlPoint,
    WeightUnit,
};
use serde::{Deserialize, Serialize};

use crate::{SchemaError, SchemaResult};

/// Current document version
pub const CALIBRATION_DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CALIBRATION_DOCUMENT_VERSION
}

/// Versioned calibration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationDocument {
    /// Document format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Control points in entry order
    #[serde(default)]
    pub points: Vec<ControlPoint>,
    /// Target unit of calibrated values
    #[serde(default)]
    pub weight_unit: WeightUnit,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyCalibrationDocument {
    Versioned(CalibrationDocument),
    Legacy(Vec<ControlPoint>),
}

impl CalibrationDocument {
    /// Parse a versioned or legacy document
    pub fn from_json(json: &str) -> SchemaResult<Self> {
        let document = match serde_json::from_str(json)? {
            AnyCalibrationDocument::Versioned(document) => document,
            AnyCalibrationDocument::Legacy(points) => Self {
                points,
                ..Self::default()
            },
        };
        if document.version > CALIBRATION_DOCUMENT_VERSION {
            log::warn!(
                "Calibration document version {} is newer than {}, reading known fields only",
                document.version,
                CALIBRATION_DOCUMENT_VERSION
            );
        }
        Ok(document)
    }

    /// Pretty JSON in the versioned format
    pub fn to_json(&self) -> SchemaResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for CalibrationDocument {
    fn default() -> Self {
        Self {
            version: CALIBRATION_DOCUMENT_VERSION,
            points: Vec::new(),
            weight_unit: WeightUnit::default(),
        }
    }
}

impl From<CalibrationSnapshot> for CalibrationDocument {
    fn from(snapshot: CalibrationSnapshot) -> Self {
        Self {
            version: CALIBRATION_DOCUMENT_VERSION,
            points: snapshot.points,
            weight_unit: snapshot.target_unit,
        }
    }
}

impl From<CalibrationDocument> for CalibrationSnapshot {
    fn from(document: CalibrationDocument) -> Self {
        Self {
            points: document.points,
            target_unit: document.weight_unit,
        }
    }
}

/// [`CalibrationStore`] backed by one JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store at `path`, created on first save
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document, `None` when the file does not exist yet
    pub fn read(&self) -> SchemaResult<Option<CalibrationDocument>> {
        match fs::read_to_string(&self.path) {
            Ok(json) => CalibrationDocument::from_json(&json).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SchemaError::io(&self.path, e)),
        }
    }

    /// Atomically replace the document
    pub fn write(&self, document: &CalibrationDocument) -> SchemaResult<()> {
        let json = document.to_json()?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| SchemaError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| SchemaError::io(&self.path, e))
    }
}

impl CalibrationStore for JsonFileStore {
    fn load(&self) -> CalibrationResult<Option<CalibrationSnapshot>> {
        self.read()
            .map(|document| document.map(Into::into))
            .map_err(|e| CalibrationError::Store(e.to_string()))
    }

    fn save(&mut self, snapshot: &CalibrationSnapshot) -> CalibrationResult<()> {
        self.write(&snapshot.clone().into())
            .map_err(|e| CalibrationError::Store(e.to_string()))
    }
}
