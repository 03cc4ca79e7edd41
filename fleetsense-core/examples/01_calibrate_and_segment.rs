//! Calibrate-and-Segment Example
//!
//! Loads a small two-device batch, calibrates the load cell and prints the
//! steady periods the segmenter finds.
//!
//! ## What You'll Learn
//!
//! - Building a batch from readings
//! - Editing calibration points through the fleet context
//! - Reading per-sensor statistics
//! - Running event analysis and exporting a CSV table
//!
//! ## Data Flow
//!
//! ```text
//! Batch → Catalog (per device) → Calibrated weight → Segmenter → Summary / CSV
//! ```
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run --example 01_calibrate_and_segment
//! ```

use fleetsense_core::{
    Batch, DateRange, DeviceBatch, Fleet, FleetResult, Reading, SegmentationConfig, SensorValues,
    WeightUnit,
};

const MINUTE: u64 = 60_000;

fn truck_readings() -> Vec<Reading> {
    // Empty, loading, loaded, unloading, empty
    let profile = [(120.0, 12), (480.0, 3), (910.0, 25), (430.0, 2), (118.0, 8)];
    let mut readings = Vec::new();
    for (level, samples) in profile {
        for i in 0..samples {
            let wobble = if i % 2 == 0 { 1.5 } else { -1.5 };
            let ts = readings.len() as u64 * MINUTE;
            readings.push(Reading::new(
                ts,
                SensorValues::new()
                    .with("spd", Some(0.0))
                    .with("vBattery", Some(12.6))
                    .with("weightRaw", Some(level + wobble)),
            ));
        }
    }
    readings
}

fn reefer_readings() -> Vec<Reading> {
    (0..40u64)
        .map(|i| {
            let door_open = (15..18).contains(&i);
            let base = if door_open { 9.0 } else { 3.5 };
            Reading::new(
                i * MINUTE,
                SensorValues::new()
                    .with("temp1", Some(base + 0.1))
                    .with("temp2", Some(base - 0.1))
                    .with("hum1", Some(70.0)),
            )
        })
        .collect()
}

fn main() -> FleetResult<()> {
    println!("FleetSense Calibrate-and-Segment Example");
    println!("========================================\n");

    let batch = Batch::new()
        .with_device("TRUCK-7", DeviceBatch::new(truck_readings()))
        .with_device("REEFER-2", DeviceBatch::new(reefer_readings()))
        .with_device("GHOST-1", DeviceBatch::default())
        .with_date(DateRange {
            interval: Some("1m".into()),
            ..DateRange::default()
        });

    let mut fleet = Fleet::new().with_segmentation(SegmentationConfig::default());
    let report = fleet.ingest(batch);
    println!("Loaded: {:?}", report.accepted);
    for warning in &report.warnings {
        println!("Skipped: {warning}");
    }

    // Two reference loads on the scale: empty trailer and 24 t of gravel
    println!("\nCalibrating load cell...");
    fleet.add_calibration_point(120.0, 0.0)?;
    fleet.add_calibration_point(910.0, 24_000.0)?;
    fleet.set_target_unit(WeightUnit::Ton);

    for record in fleet.devices() {
        println!("\n{} ({} readings)", record.device_id, record.metadata.data_points);
        for (sensor, stats) in &record.stats {
            println!(
                "  {:<18} latest {:>9.2} {:<5} min {:>9.2}  max {:>9.2}  {}",
                fleet.registry().name(sensor),
                stats.latest,
                stats.unit,
                stats.min,
                stats.max,
                stats.trend.arrow()
            );
        }
    }

    println!("\nEvent summary for TRUCK-7");
    println!("-------------------------");
    println!("{}", fleet.analyze_device("TRUCK-7")?.summary());

    println!("\nTighter band on REEFER-2 (5%, 2 min)");
    fleet.set_segmentation(SegmentationConfig::tight().with_min_duration_ms(2 * MINUTE));
    println!("{}", fleet.analyze_device("REEFER-2")?.summary());

    println!("\nCSV export (TRUCK-7, default selection)");
    let stdout = std::io::stdout();
    fleet.export_csv("TRUCK-7", None, stdout.lock())?;

    Ok(())
}
