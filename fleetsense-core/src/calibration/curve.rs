//! Piecewise-linear calibration curve
//!
//! ## Overview
//!
//! A load cell reports an analog signal. Operators record a handful of
//! reference loads as control points `(raw, calibrated)` and the curve maps
//! any raw value onto the calibrated scale by linear interpolation between
//! neighbouring points. Outside the recorded range the first (or last)
//! segment is continued linearly.
//!
//! ```text
//!  cal
//!   │                  ╱ p2      (extrapolated with last segment)
//!   │                 ╱
//!   │        p1 ╱────╱
//!   │          ╱
//!   │  p0 ────╱             (extrapolated with first segment)
//!   └──────────────────────── raw
//! ```
//!
//! ## Degenerate Curves
//!
//! - **0 or 1 points**: identity mapping. This is a valid configuration, not
//!   an error. A freshly installed device has no calibration.
//! - **Duplicate raw values**: a segment with `p2.raw == p1.raw` has no slope.
//!   Interpolation inside it returns `p2.calibrated` (a step). Extrapolation
//!   through such an end segment holds the nearest end point's calibrated
//!   value. No division by zero ever reaches the output.
//! - **Non-finite input**: returned unchanged.
//!
//! ## Ordering
//!
//! Points are stored in the order the operator entered them. Evaluation works
//! on a stable sort by raw value, so points sharing a raw value keep their
//! entry order.

use serde::{Deserialize, Serialize};

/// One reference measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    /// Signal in the native unit
    pub raw: f64,
    /// Physical value the signal corresponds to
    pub calibrated: f64,
}

impl ControlPoint {
    /// Point mapping `raw` to `calibrated`
    pub const fn new(raw: f64, calibrated: f64) -> Self {
        Self { raw, calibrated }
    }

    /// Both coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.raw.is_finite() && self.calibrated.is_finite()
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((raw, calibrated): (f64, f64)) -> Self {
        Self::new(raw, calibrated)
    }
}

/// Compiled curve ready for evaluation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalibrationCurve {
    /// Sorted by raw value (stable)
    sorted: Vec<ControlPoint>,
}

impl CalibrationCurve {
    /// Compile a curve from points in any order
    pub fn new(points: &[ControlPoint]) -> Self {
        let mut sorted = points.to_vec();
        sorted.sort_by(|a, b| a.raw.total_cmp(&b.raw));
        Self { sorted }
    }

    /// Identity curve
    pub fn identity() -> Self {
        Self::default()
    }

    /// Fewer than two points
    pub fn is_identity(&self) -> bool {
        self.sorted.len() < 2
    }

    /// Points in evaluation order
    pub fn points(&self) -> &[ControlPoint] {
        &self.sorted
    }

    /// Map a raw value onto the calibrated scale
    pub fn evaluate(&self, raw: f64) -> f64 {
        if !raw.is_finite() || self.is_identity() {
            return raw;
        }

        let points = &self.sorted;
        let first = points[0];
        let last = points[points.len() - 1];

        if raw < first.raw {
            return extrapolate(first, points[1], raw, first.calibrated);
        }
        if raw > last.raw {
            return extrapolate(points[points.len() - 2], last, raw, last.calibrated);
        }

        points
            .windows(2)
            .find(|pair| pair[0].raw <= raw && raw <= pair[1].raw)
            .map(|pair| interpolate(pair[0], pair[1], raw))
            // raw lies in [first.raw, last.raw], so a segment always matches
            .unwrap_or(raw)
    }
}

fn interpolate(p1: ControlPoint, p2: ControlPoint, raw: f64) -> f64 {
    if raw == p1.raw && p1.raw != p2.raw {
        return p1.calibrated;
    }
    if raw == p2.raw {
        return p2.calibrated;
    }
    // raw strictly between, so p2.raw > p1.raw
    p1.calibrated + (raw - p1.raw) / (p2.raw - p1.raw) * (p2.calibrated - p1.calibrated)
}

fn extrapolate(p1: ControlPoint, p2: ControlPoint, raw: f64, hold: f64) -> f64 {
    let span = p2.raw - p1.raw;
    if span == 0.0 {
        return hold;
    }
    p1.calibrated + (raw - p1.raw) / span * (p2.calibrated - p1.calibrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve(points: &[(f64, f64)]) -> CalibrationCurve {
        let points: Vec<ControlPoint> = points.iter().copied().map(ControlPoint::from).collect();
        CalibrationCurve::new(&points)
    }

    #[test]
    fn empty_and_single_point_are_identity() {
        assert_eq!(curve(&[]).evaluate(123.4), 123.4);
        assert_eq!(curve(&[(10.0, 99.0)]).evaluate(-7.0), -7.0);
    }

    #[test]
    fn three_point_scenario() {
        let c = curve(&[(0.0, 0.0), (100.0, 50.0), (200.0, 400.0)]);

        assert_relative_eq!(c.evaluate(50.0), 25.0);
        assert_relative_eq!(c.evaluate(150.0), 225.0);
        assert_relative_eq!(c.evaluate(-50.0), -25.0);
        // Last segment slope is 3.5: 50 + 150 * 3.5
        assert_relative_eq!(c.evaluate(250.0), 575.0);
    }

    #[test]
    fn control_points_map_exactly() {
        let c = curve(&[(0.1, 0.7), (0.3, 1.9), (0.35, 2.05)]);
        assert_eq!(c.evaluate(0.1), 0.7);
        assert_eq!(c.evaluate(0.3), 1.9);
        assert_eq!(c.evaluate(0.35), 2.05);
    }

    #[test]
    fn unordered_points_are_sorted() {
        let c = curve(&[(200.0, 400.0), (0.0, 0.0), (100.0, 50.0)]);
        assert_relative_eq!(c.evaluate(150.0), 225.0);
        assert_eq!(c.points()[0].raw, 0.0);
    }

    #[test]
    fn duplicate_raw_inside_range_steps() {
        let c = curve(&[(0.0, 0.0), (100.0, 50.0), (100.0, 80.0), (200.0, 180.0)]);

        // First matching segment is (0,0)-(100,50)
        assert_eq!(c.evaluate(100.0), 50.0);
        assert_relative_eq!(c.evaluate(150.0), 130.0);
        assert!(c.evaluate(100.0).is_finite());
    }

    #[test]
    fn degenerate_end_segments_hold() {
        let c = curve(&[(100.0, 10.0), (100.0, 20.0)]);
        assert_eq!(c.evaluate(50.0), 10.0);
        assert_eq!(c.evaluate(150.0), 20.0);
        assert_eq!(c.evaluate(100.0), 20.0);
    }

    #[test]
    fn non_finite_input_passes_through() {
        let c = curve(&[(0.0, 0.0), (1.0, 2.0)]);
        assert!(c.evaluate(f64::NAN).is_nan());
        assert_eq!(c.evaluate(f64::INFINITY), f64::INFINITY);
    }
}
