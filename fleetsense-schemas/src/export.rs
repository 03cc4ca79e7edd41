//! CSV export files

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use fleetsense_core::export::export_file_name;
use fleetsense_core::{ExportTable, Fleet, Timestamp};

use crate::settings::Settings;
use crate::{SchemaError, SchemaResult};

/// Write `{device}-data-{date}.csv` into `dir` and return its path.
///
/// `sensors` falls back to the device's default selection.
pub fn write_device_csv(
    fleet: &Fleet,
    device_id: &str,
    sensors: Option<&[String]>,
    dir: impl AsRef<Path>,
    now: Timestamp,
) -> SchemaResult<PathBuf> {
    let table = fleet.export(device_id, sensors)?;
    let path = dir.as_ref().join(export_file_name(device_id, now));

    let file = File::create(&path).map_err(|e| SchemaError::io(&path, e))?;
    table.write_csv(BufWriter::new(file))?;

    log::info!(
        "Exported {} rows of {} to {}",
        table.rows.len(),
        device_id,
        path.display()
    );
    Ok(path)
}

/// Tail of the export table, as many rows as `settings` allows
pub fn preview_table(
    fleet: &Fleet,
    device_id: &str,
    sensors: Option<&[String]>,
    settings: &Settings,
) -> SchemaResult<ExportTable> {
    Ok(fleet
        .export(device_id, sensors)?
        .last_rows(settings.preview_rows))
}
