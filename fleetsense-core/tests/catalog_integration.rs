//! Integration tests for catalog building through the fleet context
//!
//! Covers ingest of multi-device batches, derived channels and the event
//! analysis that runs on top of the resulting records.

mod common;

use approx::assert_relative_eq;
use fleetsense_core::{
    Batch, CatalogError, DeviceBatch, FixedTime, Fleet, Trend, WeightUnit,
};

use common::{
    generators::{device, TelemetryGenerator},
    scenarios::{batch_with_empty_device, three_point_curve},
};

#[test]
fn test_batch_with_empty_device() {
    let mut fleet = Fleet::new().with_clock(Box::new(FixedTime::new(1_700_000_000_000)));
    let report = fleet.ingest(batch_with_empty_device());

    assert_eq!(report.accepted, ["TRUCK-1", "REEFER-1"]);
    assert_eq!(report.warnings, [CatalogError::empty_device("TRUCK-2")]);
    assert_eq!(report.skipped().collect::<Vec<_>>(), ["TRUCK-2"]);

    let ids: Vec<&str> = fleet.devices().iter().map(|d| d.device_id.as_str()).collect();
    assert_eq!(ids, ["TRUCK-1", "REEFER-1"]);

    let truck = fleet.device("TRUCK-1").unwrap();
    assert_eq!(truck.metadata.interval, "1m");
    assert_eq!(truck.metadata.data_points, 60);
    assert_eq!(truck.metadata.device_type, "GPS Device");
    assert_eq!(fleet.date_range().interval.as_deref(), Some("1m"));
}

#[test]
fn test_reingest_replaces_records() {
    let mut fleet = Fleet::new();
    fleet.ingest(batch_with_empty_device());
    assert_eq!(fleet.devices().len(), 2);

    let mut generator = TelemetryGenerator::new(0);
    let readings = generator.weight_readings(&[(100.0, 5)]);
    fleet.ingest(Batch::new().with_device("TRUCK-9", DeviceBatch::new(readings)));

    assert_eq!(fleet.devices().len(), 1);
    assert!(fleet.device("TRUCK-1").is_none());
}

#[test]
fn test_probe_family_averages() {
    let mut fleet = Fleet::new();
    fleet.ingest(batch_with_empty_device());
    let reefer = fleet.device("REEFER-1").unwrap();

    assert_eq!(
        reefer.sensors,
        ["temp1", "temp2", "hum1", "hum2", "temp_avg", "hum_avg"]
    );

    for reading in &reefer.readings {
        let temp1 = reading.value("temp1").unwrap();
        let avg = reading.value("temp_avg").unwrap();
        match reading.value("temp2") {
            Some(temp2) => assert_relative_eq!(avg, (temp1 + temp2) / 2.0),
            None => assert_relative_eq!(avg, temp1),
        }
    }

    // temp2 misses every fifth reading
    assert_eq!(reefer.stats("temp2").unwrap().count(), 24);
    assert_eq!(reefer.stats("temp_avg").unwrap().count(), 30);
}

#[test]
fn test_weight_plateaus_become_events() {
    let mut fleet = Fleet::new();
    fleet.ingest(batch_with_empty_device());

    let events = fleet.analyze_device("TRUCK-1").unwrap();
    let weight = events.get("weightRaw").unwrap();
    assert_eq!(weight.total_events, 3);

    let sizes: Vec<usize> = weight.groups.iter().map(|g| g.len()).collect();
    assert_eq!(sizes, [20, 30, 10]);
    assert_eq!(weight.groups[1].duration_minutes(), 29.0);
    assert_relative_eq!(weight.groups[1].avg, 800.0, max_relative = 0.01);

    // Parked the whole time: one long speed event at zero
    let speed = events.get("spd").unwrap();
    assert_eq!(speed.total_events, 1);
    assert_eq!(speed.groups[0].len(), 60);
}

#[test]
fn test_calibration_applies_to_loaded_devices() {
    let mut fleet = Fleet::new();
    fleet.ingest(batch_with_empty_device());

    fleet.set_calibration_points(three_point_curve()).unwrap();
    fleet.set_target_unit(WeightUnit::Ton);

    let truck = fleet.device("TRUCK-1").unwrap();
    let stats = truck.stats("weightCalibrated").unwrap();
    assert_eq!(stats.unit, "tons");

    // Raw ~200 mV maps to ~400, ~800 mV continues the last segment
    let first = truck.readings[0].value("weightRaw").unwrap();
    let expected = fleet.convert_weight(first, &WeightUnit::MilliVolt);
    assert_relative_eq!(truck.readings[0].value("weightCalibrated").unwrap(), expected);
    assert_relative_eq!(expected, 0.4, max_relative = 0.05);

    // Reefer has no load cell
    assert!(!fleet.device("REEFER-1").unwrap().has_sensor("weightCalibrated"));
}

#[test]
fn test_declared_unit_scales_raw_weight() {
    let mut generator = TelemetryGenerator::new(0);
    let readings = generator.weight_readings(&[(0.5, 10)]);
    let mut fleet = Fleet::new();
    fleet.set_calibration_points(three_point_curve()).unwrap();
    fleet.ingest(Batch::new().with_device("TRUCK-T", device(readings, "tons")));

    let truck = fleet.device("TRUCK-T").unwrap();
    let raw = truck.readings[0].value("weightRaw").unwrap();
    // tons → mV is ×1000, so ~0.5 t lands at ~500 on the curve
    let calibrated = truck.readings[0].value("weightCalibrated").unwrap();
    assert_relative_eq!(calibrated, 50.0 + (raw * 1000.0 - 100.0) * 3.5, max_relative = 1e-9);
}

#[test]
fn test_trend_reflects_last_readings() {
    let mut generator = TelemetryGenerator::new(0);
    let readings = generator.weight_readings(&[(100.0, 10), (300.0, 5)]);
    let mut fleet = Fleet::new();
    fleet.ingest(Batch::new().with_device("TRUCK-L", DeviceBatch::new(readings)));

    let stats = fleet.device("TRUCK-L").unwrap().stats("weightRaw").unwrap();
    assert_eq!(stats.trend, Trend::Up);
    assert_eq!(stats.count(), 15);
}
