//! End-to-End Integration Tests for FleetSense
//!
//! Each test starts from files on disk the way a deployment does: a batch
//! dump, a calibration file and a settings file. It finishes with events and
//! an exported CSV.

use fleetsense_core::constants::WEIGHT_CALIBRATED_KEY;
use fleetsense_core::{Fleet, FixedTime, WeightUnit};
use fleetsense_schemas::{read_batch, write_device_csv, JsonFileStore, Settings};
use tempfile::TempDir;

// ===== TEST CONSTANTS =====

/// 2024-03-01T08:00:00Z
const SHIFT_START_MS: u64 = 1_709_280_000_000;

/// One sample per minute, the usual tracker export interval
const SAMPLE_INTERVAL_MS: u64 = 60_000;

/// Empty trailer signal
const EMPTY_RAW_MV: f64 = 200.0;

/// Loaded trailer signal
const LOADED_RAW_MV: f64 = 800.0;

fn weight_point(minute: u64, raw: f64) -> String {
    let dtt = SHIFT_START_MS + minute * SAMPLE_INTERVAL_MS;
    format!(r#"{{ "dtt": {dtt}, "dts": {}, "spd": 0, "weightRaw": {raw} }}"#, dtt + 1500)
}

/// 20 min empty, 30 min loaded, 10 min empty, one point without `dtt`
fn write_batch(dir: &TempDir) -> std::path::PathBuf {
    let mut points: Vec<String> = (0..60u64)
        .map(|minute| {
            let raw = if (20..50).contains(&minute) { LOADED_RAW_MV } else { EMPTY_RAW_MV };
            weight_point(minute, raw)
        })
        .collect();
    points.push(r#"{ "spd": 0 }"#.to_string());

    let json = format!(
        r#"{{
            "date": {{ "from": "2024-03-01 08:00", "to": "2024-03-01 09:00", "interval": "1m" }},
            "devices": {{
                "TRUCK-1": {{
                    "metadata": {{ "weightUnit": "mV", "deviceType": "Truck" }},
                    "points": [{}]
                }},
                "TRUCK-2": {{ "points": [] }}
            }}
        }}"#,
        points.join(",")
    );
    let path = dir.path().join("batch.json");
    std::fs::write(&path, json).unwrap();
    path
}

#[test]
fn test_batch_file_to_events_and_csv() {
    let dir = TempDir::new().unwrap();
    let decoded = read_batch(write_batch(&dir)).unwrap();
    assert_eq!(decoded.warnings.len(), 1);

    let mut fleet = Fleet::new()
        .with_clock(Box::new(FixedTime::new(SHIFT_START_MS)))
        .with_store(Box::new(JsonFileStore::new(dir.path().join("calibration.json"))));
    Settings::default().apply(&mut fleet).unwrap();

    let report = fleet.ingest(decoded.batch);
    assert_eq!(report.accepted, ["TRUCK-1"]);
    assert_eq!(report.skipped().collect::<Vec<_>>(), ["TRUCK-2"]);

    fleet.add_calibration_point(0.0, 0.0).unwrap();
    fleet.add_calibration_point(1000.0, 25.0).unwrap();
    fleet.set_target_unit(WeightUnit::Ton);

    let record = fleet.device("TRUCK-1").unwrap();
    assert!(record.has_sensor(WEIGHT_CALIBRATED_KEY));
    assert_eq!(fleet.registry().unit(WEIGHT_CALIBRATED_KEY), "tons");

    let events = fleet.analyze_device("TRUCK-1").unwrap();
    let weight = events.get(WEIGHT_CALIBRATED_KEY).unwrap();
    assert_eq!(weight.total_events, 3);
    assert_eq!(weight.groups[1].len(), 30);

    let path = write_device_csv(&fleet, "TRUCK-1", None, dir.path(), SHIFT_START_MS).unwrap();
    assert_eq!(path.file_name().unwrap(), "TRUCK-1-data-2024-03-01.csv");
    let csv = std::fs::read_to_string(path).unwrap();
    assert_eq!(csv.lines().count(), 61);
}

#[test]
fn test_calibration_survives_restart() {
    let dir = TempDir::new().unwrap();
    let store_path = dir.path().join("calibration.json");

    {
        let mut fleet = Fleet::new().with_store(Box::new(JsonFileStore::new(&store_path)));
        fleet.add_calibration_point(0.0, 0.0).unwrap();
        fleet.add_calibration_point(1000.0, 25.0).unwrap();
        fleet.set_target_unit(WeightUnit::Ton);
    }

    let mut fleet = Fleet::new().with_store(Box::new(JsonFileStore::new(&store_path)));
    fleet.ingest(read_batch(write_batch(&dir)).unwrap().batch);

    let calibrated: Vec<f64> = fleet
        .device("TRUCK-1")
        .unwrap()
        .series(WEIGHT_CALIBRATED_KEY)
        .filter_map(|(_, value)| value)
        .collect();
    assert_eq!(calibrated.len(), 60);
    assert!((calibrated[0] - 0.005).abs() < 1e-12);
    assert!((calibrated[30] - 0.02).abs() < 1e-12);
}

#[test]
fn test_settings_file_changes_event_count() {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.json");
    std::fs::write(&settings_path, r#"{ "minDurationMinutes": 25 }"#).unwrap();

    let mut fleet = Fleet::new();
    Settings::load(&settings_path).unwrap().apply(&mut fleet).unwrap();
    fleet.ingest(read_batch(write_batch(&dir)).unwrap().batch);

    let groups = fleet.segment("TRUCK-1", "weightRaw").unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].values[0], LOADED_RAW_MV);
}
