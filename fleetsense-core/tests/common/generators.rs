//! Deterministic telemetry generators
//!
//! Field data is mostly plateaus (parked, loaded, idling) joined by short
//! transitions. The generators below reproduce that shape with a seeded
//! linear congruential generator so every run sees the same numbers.

use fleetsense_core::{DeviceBatch, Reading, SensorValues, Timestamp};

use super::MINUTE;

/// Seeded generator for readings at a fixed interval
pub struct TelemetryGenerator {
    seed: u32,
    start: Timestamp,
    interval_ms: u64,
}

impl TelemetryGenerator {
    pub fn new(start: Timestamp) -> Self {
        Self {
            seed: 42,
            start,
            interval_ms: MINUTE,
        }
    }

    pub fn with_interval(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }

    fn timestamp(&self, index: usize) -> Timestamp {
        self.start + index as u64 * self.interval_ms
    }

    /// Uniform noise in `[-amplitude, amplitude]`
    pub fn noise(&mut self, amplitude: f64) -> f64 {
        self.seed = self.seed.wrapping_mul(1664525).wrapping_add(1013904223);
        let uniform = self.seed as f64 / u32::MAX as f64;
        (uniform - 0.5) * 2.0 * amplitude
    }

    /// Consecutive plateaus `(level, samples)` with relative noise.
    ///
    /// Noise stays well inside a 10% band as long as `noise_fraction` is
    /// below 0.03.
    pub fn plateau_series(
        &mut self,
        plateaus: &[(f64, usize)],
        noise_fraction: f64,
    ) -> Vec<(Timestamp, Option<f64>)> {
        let mut series = Vec::new();
        for &(level, samples) in plateaus {
            for _ in 0..samples {
                let value = level + self.noise(level.abs() * noise_fraction);
                series.push((self.timestamp(series.len()), Some(value)));
            }
        }
        series
    }

    /// Load-cell readings following the given plateaus
    pub fn weight_readings(&mut self, plateaus: &[(f64, usize)]) -> Vec<Reading> {
        self.plateau_series(plateaus, 0.01)
            .into_iter()
            .map(|(ts, value)| {
                Reading::new(
                    ts,
                    SensorValues::new()
                        .with("spd", Some(0.0))
                        .with("weightRaw", value),
                )
                .with_received(ts + 1_500)
            })
            .collect()
    }

    /// Two temperature and two humidity probes, `temp2` dropping out on
    /// every fifth reading
    pub fn probe_readings(&mut self, samples: usize) -> Vec<Reading> {
        (0..samples)
            .map(|i| {
                let temp1 = 4.0 + self.noise(0.2);
                let temp2 = 4.5 + self.noise(0.2);
                let hum1 = 60.0 + self.noise(1.0);
                let hum2 = 62.0 + self.noise(1.0);
                Reading::new(
                    self.timestamp(i),
                    SensorValues::new()
                        .with("temp1", Some(temp1))
                        .with("temp2", (i % 5 != 0).then_some(temp2))
                        .with("hum1", Some(hum1))
                        .with("hum2", Some(hum2)),
                )
            })
            .collect()
    }
}

/// Device batch from readings with a declared raw weight unit
pub fn device(readings: Vec<Reading>, weight_unit: &str) -> DeviceBatch {
    DeviceBatch::new(readings).with_weight_unit(weight_unit.into())
}
