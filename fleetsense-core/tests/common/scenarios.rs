//! Reference scenarios shared by the integration tests

use fleetsense_core::{Batch, ControlPoint, DateRange, DeviceBatch, Timestamp};

use super::generators::{device, TelemetryGenerator};
use super::minute_series;

/// Three-point curve with a steep last segment
pub fn three_point_curve() -> Vec<ControlPoint> {
    vec![
        ControlPoint::new(0.0, 0.0),
        ControlPoint::new(100.0, 50.0),
        ControlPoint::new(200.0, 400.0),
    ]
}

/// Steady level, a three-minute spike, then a single stray point
pub fn spike_series() -> Vec<(Timestamp, Option<f64>)> {
    minute_series(&[10.0, 10.2, 10.1, 10.3, 50.0, 51.0, 49.0, 10.4])
}

/// Three devices, the middle one without readings
pub fn batch_with_empty_device() -> Batch {
    let mut generator = TelemetryGenerator::new(1_700_000_000_000);
    let truck = generator.weight_readings(&[(200.0, 20), (800.0, 30), (200.0, 10)]);
    let reefer = generator.probe_readings(30);

    Batch::new()
        .with_device("TRUCK-1", device(truck, "mV"))
        .with_device("TRUCK-2", DeviceBatch::default())
        .with_device("REEFER-1", DeviceBatch::new(reefer))
        .with_date(DateRange {
            from: Some("2023-11-14T22:13:20Z".into()),
            to: Some("2023-11-14T23:13:20Z".into()),
            interval: Some("1m".into()),
        })
}
