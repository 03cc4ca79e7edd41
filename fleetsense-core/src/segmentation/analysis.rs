//! Per-device event analysis

use serde::{Deserialize, Serialize};

use super::{EventGroup, Segmenter};
use crate::catalog::DeviceRecord;
use crate::registry::SensorRegistry;

/// Events detected on one sensor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorEvents {
    /// Sensor key
    pub sensor: String,
    /// Display name at analysis time
    pub name: String,
    /// Unit symbol
    pub unit: String,
    /// Events in chronological order
    pub groups: Vec<EventGroup>,
    /// Number of events
    pub total_events: usize,
}

impl SensorEvents {
    /// Header plus one block per event
    pub fn summary(&self) -> String {
        let mut blocks = vec![format!(
            "{} ({}): {} events detected",
            self.name, self.unit, self.total_events
        )];
        blocks.extend(
            self.groups
                .iter()
                .enumerate()
                .map(|(i, group)| group.summary(i + 1, &self.unit)),
        );
        blocks.join("\n\n")
    }
}

/// Event analysis of every sensor of one device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceEvents {
    /// Analyzed device
    pub device_id: String,
    /// Sensors with at least one event, in the device's sensor order
    pub sensors: Vec<SensorEvents>,
}

impl DeviceEvents {
    /// No sensor had an event
    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    /// Events of one sensor
    pub fn get(&self, sensor: &str) -> Option<&SensorEvents> {
        self.sensors.iter().find(|s| s.sensor == sensor)
    }

    /// Plain-text report of every sensor's events
    pub fn summary(&self) -> String {
        if self.is_empty() {
            return "No significant events detected with current thresholds.".to_string();
        }
        self.sensors
            .iter()
            .map(SensorEvents::summary)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Segment every available sensor of a device
pub fn analyze_device(
    record: &DeviceRecord,
    registry: &SensorRegistry,
    segmenter: &Segmenter,
) -> DeviceEvents {
    let sensors = record
        .sensors
        .iter()
        .filter_map(|sensor| {
            let groups = segmenter.segment(record.series(sensor));
            if groups.is_empty() {
                return None;
            }
            Some(SensorEvents {
                sensor: sensor.clone(),
                name: registry.name(sensor).to_string(),
                unit: registry.unit(sensor).to_string(),
                total_events: groups.len(),
                groups,
            })
        })
        .collect();

    DeviceEvents {
        device_id: record.device_id.clone(),
        sensors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogBuilder;
    use crate::ingest::DeviceBatch;
    use crate::reading::{Reading, SensorValues};
    use crate::segmentation::SegmentationConfig;

    #[test]
    fn only_sensors_with_events_are_reported() {
        let readings = (0..10u64)
            .map(|i| {
                let spd = if i % 2 == 0 { 10.0 } else { 90.0 };
                Reading::new(
                    i * 60_000,
                    SensorValues::new()
                        .with("dBattery", Some(80.0))
                        .with("spd", Some(spd)),
                )
            })
            .collect();

        let mut registry = SensorRegistry::with_defaults();
        let record = CatalogBuilder::new(&mut registry)
            .build("GPS-001", DeviceBatch::new(readings))
            .unwrap();

        let segmenter = Segmenter::new(SegmentationConfig::default());
        let events = analyze_device(&record, &registry, &segmenter);

        assert_eq!(events.sensors.len(), 1);
        let battery = events.get("dBattery").unwrap();
        assert_eq!(battery.name, "Battery Percentage");
        assert_eq!(battery.unit, "%");
        assert_eq!(battery.total_events, 1);
        assert_eq!(battery.groups[0].duration_minutes(), 9.0);
        assert!(events.summary().starts_with("Battery Percentage (%): 1 events detected"));
    }

    #[test]
    fn empty_analysis_summary() {
        let events = DeviceEvents {
            device_id: "X".into(),
            sensors: Vec::new(),
        };
        assert_eq!(
            events.summary(),
            "No significant events detected with current thresholds."
        );
    }
}
