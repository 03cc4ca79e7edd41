//! Weight calibration
//!
//! Converts the raw load-cell signal into a physical weight:
//!
//! 1. bring the raw value into the native unit (`mV`) with the device's
//!    declared unit factor,
//! 2. evaluate the piecewise-linear [`CalibrationCurve`],
//! 3. express the result in the configured target unit.
//!
//! [`WeightCalibration`] is the editable state (control points plus target
//! unit). It is a plain value; persistence and recomputation of device
//! records are the caller's job (see [`Fleet`](crate::Fleet)).

mod curve;
mod store;
mod units;

pub use curve::{CalibrationCurve, ControlPoint};
pub use store::{CalibrationSnapshot, CalibrationStore, MemoryCalibrationStore};
pub use units::WeightUnit;

use crate::errors::{CalibrationError, CalibrationResult};

/// Strategy for turning a raw weight into a calibrated one
pub trait WeightConverter {
    /// Calibrated weight, in [`target_unit`](Self::target_unit)
    fn convert_weight(&self, raw: f64, source_unit: &WeightUnit) -> f64;

    /// Unit of the converted values
    fn target_unit(&self) -> &WeightUnit;
}

/// Editable calibration state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeightCalibration {
    /// Entry order, as shown to the operator
    points: Vec<ControlPoint>,
    target_unit: WeightUnit,
    curve: CalibrationCurve,
}

impl WeightCalibration {
    /// No points, native target unit
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibration from control points, rejecting non-finite ones
    pub fn with_points(points: Vec<ControlPoint>) -> CalibrationResult<Self> {
        let mut calibration = Self::new();
        calibration.set_points(points)?;
        Ok(calibration)
    }

    /// Report calibrated values in `unit`
    pub fn with_target_unit(mut self, unit: WeightUnit) -> Self {
        self.target_unit = unit;
        self
    }

    /// Restore state from a stored snapshot.
    ///
    /// Non-finite points are dropped with a warning instead of rejecting the
    /// whole snapshot.
    pub fn from_snapshot(snapshot: CalibrationSnapshot) -> Self {
        let total = snapshot.points.len();
        let points: Vec<ControlPoint> =
            snapshot.points.into_iter().filter(ControlPoint::is_finite).collect();
        if points.len() != total {
            log_warn!(
                "Calibration snapshot: dropped {} non-finite control point(s)",
                total - points.len()
            );
        }
        let curve = CalibrationCurve::new(&points);
        Self {
            points,
            target_unit: snapshot.target_unit,
            curve,
        }
    }

    /// Flat copy for persistence
    pub fn snapshot(&self) -> CalibrationSnapshot {
        CalibrationSnapshot {
            points: self.points.clone(),
            target_unit: self.target_unit.clone(),
        }
    }

    /// Control points in entry order
    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Curve built from the current points
    pub fn curve(&self) -> &CalibrationCurve {
        &self.curve
    }

    /// Fewer than two points, so values pass through
    pub fn is_identity(&self) -> bool {
        self.curve.is_identity()
    }

    /// Append a control point
    pub fn add_point(&mut self, raw: f64, calibrated: f64) -> CalibrationResult<()> {
        let point = checked_point(raw, calibrated)?;
        self.points.push(point);
        self.rebuild();
        Ok(())
    }

    /// Change one or both coordinates of an existing point
    pub fn update_point(
        &mut self,
        index: usize,
        raw: Option<f64>,
        calibrated: Option<f64>,
    ) -> CalibrationResult<()> {
        let len = self.points.len();
        let current = *self
            .points
            .get(index)
            .ok_or(CalibrationError::PointIndexOutOfRange { index, len })?;

        let updated = checked_point(
            raw.unwrap_or(current.raw),
            calibrated.unwrap_or(current.calibrated),
        )?;
        self.points[index] = updated;
        self.rebuild();
        Ok(())
    }

    /// Remove a point, returning it
    pub fn remove_point(&mut self, index: usize) -> CalibrationResult<ControlPoint> {
        let len = self.points.len();
        if index >= len {
            return Err(CalibrationError::PointIndexOutOfRange { index, len });
        }
        let removed = self.points.remove(index);
        self.rebuild();
        Ok(removed)
    }

    /// Replace every point. Nothing changes if any point is not finite.
    pub fn set_points(&mut self, points: Vec<ControlPoint>) -> CalibrationResult<()> {
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(CalibrationError::NonFinitePoint {
                raw: bad.raw,
                calibrated: bad.calibrated,
            });
        }
        self.points = points;
        self.rebuild();
        Ok(())
    }

    /// Change the reporting unit
    pub fn set_target_unit(&mut self, unit: WeightUnit) {
        self.target_unit = unit;
    }

    fn rebuild(&mut self) {
        self.curve = CalibrationCurve::new(&self.points);
    }
}

impl WeightConverter for WeightCalibration {
    fn convert_weight(&self, raw: f64, source_unit: &WeightUnit) -> f64 {
        let native = source_unit.to_native(raw);
        let calibrated = self.curve.evaluate(native);
        self.target_unit.from_native(calibrated)
    }

    fn target_unit(&self) -> &WeightUnit {
        &self.target_unit
    }
}

fn checked_point(raw: f64, calibrated: f64) -> CalibrationResult<ControlPoint> {
    let point = ControlPoint::new(raw, calibrated);
    if point.is_finite() {
        Ok(point)
    } else {
        Err(CalibrationError::NonFinitePoint { raw, calibrated })
    }
}
