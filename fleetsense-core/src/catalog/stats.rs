//! Per-sensor statistics

use serde::{Deserialize, Serialize};

use crate::constants::sensors::{TREND_DOWN_RATIO, TREND_UP_RATIO, TREND_WINDOW};

/// Direction of the most recent values relative to the ones before them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Recent values above the previous window
    Up,
    /// Recent values below the previous window
    Down,
    /// Within 5% either way, or not enough history
    #[default]
    Stable,
}

impl Trend {
    /// Compare the mean of the last [`TREND_WINDOW`] values with the mean of
    /// the window before it.
    ///
    /// Short sequences use whatever values each window actually holds. With
    /// no older values there is nothing to compare and the trend is stable.
    pub fn of(values: &[f64]) -> Self {
        if values.len() < 2 {
            return Trend::Stable;
        }
        let split = values.len().saturating_sub(TREND_WINDOW);
        let (head, recent) = values.split_at(split);
        let older = &head[head.len().saturating_sub(TREND_WINDOW)..];

        let (Some(recent), Some(older)) = (mean(recent), mean(older)) else {
            return Trend::Stable;
        };

        if recent > older * TREND_UP_RATIO {
            Trend::Up
        } else if recent < older * TREND_DOWN_RATIO {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    /// Arrow glyph for summaries
    pub fn arrow(&self) -> &'static str {
        match self {
            Trend::Up => "↗",
            Trend::Down => "↘",
            Trend::Stable => "→",
        }
    }
}

/// Aggregates over the non-null values of one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorStats {
    /// Smallest value
    pub min: f64,
    /// Largest value
    pub max: f64,
    /// Arithmetic mean
    pub avg: f64,
    /// Value of the chronologically last reading that had one
    pub latest: f64,
    /// Unit symbol at computation time
    pub unit: String,
    /// Non-null values in reading order
    pub values: Vec<f64>,
    /// Direction of the last values
    pub trend: Trend,
}

impl SensorStats {
    /// Statistics over finite values, `None` if there are none
    pub fn compute(values: impl IntoIterator<Item = f64>, unit: impl Into<String>) -> Option<Self> {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let latest = *values.last()?;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = mean(&values)?;
        let trend = Trend::of(&values);

        Some(Self {
            min,
            max,
            avg,
            latest,
            unit: unit.into(),
            values,
            trend,
        })
    }

    /// Number of values
    pub fn count(&self) -> usize {
        self.values.len()
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
