//! Flat table export
//!
//! One row per reading, one column per selected sensor:
//!
//! ```text
//! Time,Speed (km/h),Weight Calibrated (kg)
//! 2024-03-01T08:00:00.000Z,42.00 km/h,N/A
//! ```
//!
//! Rendering goes through the `csv` crate so names containing commas or
//! quotes stay well-formed.

use std::io::Write;

use crate::catalog::DeviceRecord;
use crate::errors::ExportResult;
use crate::registry::SensorRegistry;
use crate::time::{format_iso8601, Timestamp};

/// Header of the time column
pub const TIME_HEADER: &str = "Time";

/// Cell text for a missing value
pub const MISSING_CELL: &str = "N/A";

/// Rendered table, ready to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    /// `Time` followed by one `Name (unit)` header per sensor
    pub headers: Vec<String>,
    /// One row per reading, cells already formatted
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Table of `sensors` for every reading of `record`
    pub fn from_record(record: &DeviceRecord, sensors: &[String], registry: &SensorRegistry) -> Self {
        let headers = std::iter::once(TIME_HEADER.to_string())
            .chain(
                sensors
                    .iter()
                    .map(|s| format!("{} ({})", registry.name(s), registry.unit(s))),
            )
            .collect();

        let rows = record
            .readings
            .iter()
            .map(|reading| {
                std::iter::once(format_iso8601(reading.timestamp()))
                    .chain(
                        sensors
                            .iter()
                            .map(|s| format_cell(reading.value(s), registry.unit(s))),
                    )
                    .collect()
            })
            .collect();

        Self { headers, rows }
    }

    /// Keep only the last `n` rows (table previews)
    pub fn last_rows(mut self, n: usize) -> Self {
        let skip = self.rows.len().saturating_sub(n);
        self.rows.drain(..skip);
        self
    }

    /// Render as CSV into `writer`
    pub fn write_csv<W: Write>(&self, writer: W) -> ExportResult<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Render as a CSV string
    pub fn to_csv_string(&self) -> ExportResult<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }
}

/// `42.00 km/h`, `42.00` without a unit, `N/A` when missing
pub fn format_cell(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{v:.2}"),
        Some(v) => format!("{v:.2} {unit}"),
        None => MISSING_CELL.to_string(),
    }
}

/// Download name such as `GPS-001-data-2024-03-01.csv`
pub fn export_file_name(device_id: &str, now: Timestamp) -> String {
    let date: String = format_iso8601(now).chars().take(10).collect();
    format!("{device_id}-data-{date}.csv")
}
