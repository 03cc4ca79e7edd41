//! Calibration persistence seam
//!
//! The core never touches the filesystem. Whoever owns calibration state
//! hands every committed snapshot to a [`CalibrationStore`]; the JSON file
//! implementation lives in `fleetsense-schemas`.

use serde::{Deserialize, Serialize};

use super::{ControlPoint, WeightUnit};
use crate::errors::CalibrationResult;

/// Flat persisted form of the calibration state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationSnapshot {
    /// Control points in entry order
    #[serde(default)]
    pub points: Vec<ControlPoint>,
    /// Unit calibrated values are reported in
    #[serde(default)]
    pub target_unit: WeightUnit,
}

/// Storage backend for calibration snapshots
pub trait CalibrationStore {
    /// Previously saved snapshot, `None` when nothing was stored yet
    fn load(&self) -> CalibrationResult<Option<CalibrationSnapshot>>;

    /// Replace the stored snapshot
    fn save(&mut self, snapshot: &CalibrationSnapshot) -> CalibrationResult<()>;
}

/// In-memory store, mostly for tests
#[derive(Debug, Clone, Default)]
pub struct MemoryCalibrationStore {
    snapshot: Option<CalibrationSnapshot>,
    saves: usize,
}

impl MemoryCalibrationStore {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a snapshot
    pub fn with_snapshot(snapshot: CalibrationSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            saves: 0,
        }
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }

    /// Last saved snapshot
    pub fn snapshot(&self) -> Option<&CalibrationSnapshot> {
        self.snapshot.as_ref()
    }
}

impl CalibrationStore for MemoryCalibrationStore {
    fn load(&self) -> CalibrationResult<Option<CalibrationSnapshot>> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &CalibrationSnapshot) -> CalibrationResult<()> {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_keeps_last_snapshot() {
        let mut store = MemoryCalibrationStore::new();
        assert_eq!(store.load(), Ok(None));

        let snapshot = CalibrationSnapshot {
            points: vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(10.0, 5.0)],
            target_unit: WeightUnit::Kilogram,
        };
        store.save(&snapshot).unwrap();
        store.save(&snapshot).unwrap();

        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load(), Ok(Some(snapshot)));
    }
}
