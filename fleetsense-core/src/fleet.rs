//! Fleet context
//!
//! ## Overview
//!
//! [`Fleet`] owns everything a session works with: the sensor registry, the
//! calibration state, the segmentation settings and the device records built
//! from the last ingested batch. All pipeline operations go through it, so no
//! state is global.
//!
//! ## Update Rules
//!
//! - **Ingest** replaces every device record. Nothing is merged with the
//!   previous batch.
//! - **Calibration edits** are persisted, then every record's calibrated
//!   weight is recomputed into new records which replace the old ones in one
//!   step. A failing store is logged; the edit still applies.
//! - **Segmentation changes** re-run the analysis of the device whose summary
//!   is currently open.

use std::io::Write;

use crate::calibration::{
    CalibrationStore, ControlPoint, WeightCalibration, WeightConverter, WeightUnit,
};
use crate::catalog::{self, CatalogBuilder, DeviceRecord, SensorFamily};
use crate::constants::WEIGHT_CALIBRATED_KEY;
use crate::errors::{CatalogError, ConfigError, FleetError, FleetResult};
use crate::export::ExportTable;
use crate::ingest::{Batch, DateRange, IngestReport};
use crate::registry::SensorRegistry;
use crate::segmentation::{self, DeviceEvents, EventGroup, SegmentationConfig, Segmenter};
use crate::time::{minutes_to_ms, SystemTime, TimeSource};

/// Session state of the telemetry pipeline
pub struct Fleet {
    registry: SensorRegistry,
    calibration: WeightCalibration,
    segmentation: SegmentationConfig,
    families: Vec<SensorFamily>,
    devices: Vec<DeviceRecord>,
    date: DateRange,
    store: Option<Box<dyn CalibrationStore>>,
    clock: Box<dyn TimeSource>,
    summary: Option<DeviceEvents>,
}

impl Default for Fleet {
    fn default() -> Self {
        let mut fleet = Self {
            registry: SensorRegistry::with_defaults(),
            calibration: WeightCalibration::new(),
            segmentation: SegmentationConfig::default(),
            families: SensorFamily::defaults(),
            devices: Vec::new(),
            date: DateRange::default(),
            store: None,
            clock: Box::new(SystemTime),
            summary: None,
        };
        fleet.sync_calibrated_unit();
        fleet
    }
}

impl Fleet {
    /// Uncalibrated fleet on the system clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist calibration through `store`, starting from what it holds
    pub fn with_store(mut self, store: Box<dyn CalibrationStore>) -> Self {
        match store.load() {
            Ok(Some(snapshot)) => {
                self.calibration = WeightCalibration::from_snapshot(snapshot);
                self.sync_calibrated_unit();
            }
            Ok(None) => {}
            Err(e) => {
                log_warn!("Calibration store load failed, starting uncalibrated: {}", e);
            }
        }
        self.store = Some(store);
        self
    }

    /// Start from this calibration state
    pub fn with_calibration(mut self, calibration: WeightCalibration) -> Self {
        self.calibration = calibration;
        self.sync_calibrated_unit();
        self
    }

    /// Start with these segmentation parameters
    pub fn with_segmentation(mut self, config: SegmentationConfig) -> Self {
        self.segmentation = config;
        self
    }

    /// Replace the default probe families
    pub fn with_families(mut self, families: Vec<SensorFamily>) -> Self {
        self.families = families;
        self
    }

    /// Start from a pre-filled sensor registry
    pub fn with_registry(mut self, registry: SensorRegistry) -> Self {
        self.registry = registry;
        self.sync_calibrated_unit();
        self
    }

    /// Clock used for default `last_update` values
    pub fn with_clock(mut self, clock: Box<dyn TimeSource>) -> Self {
        self.clock = clock;
        self
    }

    // ===== ACCESSORS =====

    /// Display entries of every sensor seen so far
    pub fn registry(&self) -> &SensorRegistry {
        &self.registry
    }

    /// Current calibration state
    pub fn calibration(&self) -> &WeightCalibration {
        &self.calibration
    }

    /// Current segmentation parameters
    pub fn segmentation(&self) -> &SegmentationConfig {
        &self.segmentation
    }

    /// Date descriptor of the last batch
    pub fn date_range(&self) -> &DateRange {
        &self.date
    }

    /// Records in batch order
    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    /// Record of one device, if the last batch had it
    pub fn device(&self, device_id: &str) -> Option<&DeviceRecord> {
        self.devices.iter().find(|d| d.device_id == device_id)
    }

    /// How long ago the device last reported, measured on the fleet clock
    pub fn last_seen(&self, device_id: &str) -> FleetResult<String> {
        Ok(self.require(device_id)?.metadata.last_seen(self.clock.now()))
    }

    fn require(&self, device_id: &str) -> FleetResult<&DeviceRecord> {
        self.device(device_id)
            .ok_or_else(|| FleetError::UnknownDevice(device_id.to_string()))
    }

    // ===== INGEST =====

    /// Replace all device records with the contents of `batch`.
    ///
    /// Devices without readings are skipped and reported; the rest of the
    /// batch still loads.
    pub fn ingest(&mut self, batch: Batch) -> IngestReport {
        let mut report = IngestReport::default();
        if batch.is_empty() {
            log_warn!("Ingest: batch contains no devices");
            report.warnings.push(CatalogError::empty_batch());
        }

        let Batch { devices, date } = batch;
        let mut builder = CatalogBuilder::new(&mut self.registry)
            .with_converter(&self.calibration)
            .with_families(self.families.clone())
            .with_now(self.clock.now())
            .with_interval(date.interval.clone());

        let mut records = Vec::with_capacity(devices.len());
        for (device_id, device) in devices {
            match builder.build(&device_id, device) {
                Ok(record) => {
                    report.accepted.push(device_id);
                    records.push(record);
                }
                Err(e) => {
                    log_warn!("Ingest: skipping device: {}", e);
                    report.warnings.push(e);
                }
            }
        }

        self.devices = records;
        self.date = date;
        self.summary = None;

        log_debug!(
            "Ingest: {} device(s) loaded, {} warning(s)",
            report.accepted.len(),
            report.warnings.len()
        );
        report
    }

    // ===== CALIBRATION =====

    /// Append a control point and recompute every record
    pub fn add_calibration_point(&mut self, raw: f64, calibrated: f64) -> FleetResult<()> {
        self.calibration.add_point(raw, calibrated)?;
        self.commit_calibration();
        Ok(())
    }

    /// Edit one coordinate of a control point and recompute
    pub fn update_calibration_point(
        &mut self,
        index: usize,
        raw: Option<f64>,
        calibrated: Option<f64>,
    ) -> FleetResult<()> {
        self.calibration.update_point(index, raw, calibrated)?;
        self.commit_calibration();
        Ok(())
    }

    /// Remove a control point and recompute
    pub fn remove_calibration_point(&mut self, index: usize) -> FleetResult<ControlPoint> {
        let removed = self.calibration.remove_point(index)?;
        self.commit_calibration();
        Ok(removed)
    }

    /// Replace all control points and recompute
    pub fn set_calibration_points(&mut self, points: Vec<ControlPoint>) -> FleetResult<()> {
        self.calibration.set_points(points)?;
        self.commit_calibration();
        Ok(())
    }

    /// Report calibrated weight in `unit` from now on
    pub fn set_target_unit(&mut self, unit: WeightUnit) {
        self.calibration.set_target_unit(unit);
        self.commit_calibration();
    }

    /// Calibrate one raw value with the current state
    pub fn convert_weight(&self, raw: f64, source_unit: &WeightUnit) -> f64 {
        self.calibration.convert_weight(raw, source_unit)
    }

    /// Persist, then recompute every record and swap them in
    fn commit_calibration(&mut self) {
        if let Some(store) = self.store.as_mut() {
            if let Err(e) = store.save(&self.calibration.snapshot()) {
                log_warn!("Calibration not persisted: {}", e);
            }
        }

        let recomputed: Vec<DeviceRecord> = self
            .devices
            .iter()
            .map(|record| catalog::recalibrate(record, &self.calibration, &mut self.registry))
            .collect();
        self.devices = recomputed;
        self.sync_calibrated_unit();

        log_debug!(
            "Calibration committed: {} point(s), target {}",
            self.calibration.points().len(),
            self.calibration.target_unit()
        );
        self.refresh_summary();
    }

    fn sync_calibrated_unit(&mut self) {
        self.registry
            .set_unit(WEIGHT_CALIBRATED_KEY, self.calibration.target_unit().symbol());
    }

    // ===== SEGMENTATION =====

    /// Replace segmentation parameters and refresh the open summary
    pub fn set_segmentation(&mut self, config: SegmentationConfig) {
        self.segmentation = config;
        self.refresh_summary();
    }

    /// Operator-facing threshold input, in percent
    pub fn set_grouping_threshold_percent(&mut self, percent: f64) -> FleetResult<()> {
        let minutes = self.segmentation.min_duration_minutes();
        let config = SegmentationConfig::from_percent_and_minutes(percent, minutes)?;
        self.set_segmentation(config);
        Ok(())
    }

    /// Operator-facing minimum duration input, in minutes
    pub fn set_min_duration_minutes(&mut self, minutes: f64) -> FleetResult<()> {
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(ConfigError::InvalidDuration(minutes).into());
        }
        let config = self.segmentation.with_min_duration_ms(minutes_to_ms(minutes));
        self.set_segmentation(config);
        Ok(())
    }

    /// Events of one sensor of one device
    pub fn segment(&self, device_id: &str, sensor: &str) -> FleetResult<Vec<EventGroup>> {
        let record = self.require(device_id)?;
        Ok(Segmenter::new(self.segmentation).segment(record.series(sensor)))
    }

    /// Analyze every sensor of a device and keep it as the open summary
    pub fn analyze_device(&mut self, device_id: &str) -> FleetResult<&DeviceEvents> {
        let record = self.require(device_id)?;
        let events = segmentation::analyze_device(
            record,
            &self.registry,
            &Segmenter::new(self.segmentation),
        );
        Ok(self.summary.insert(events))
    }

    /// Analysis of the device whose summary is open
    pub fn current_summary(&self) -> Option<&DeviceEvents> {
        self.summary.as_ref()
    }

    /// Forget the open device analysis
    pub fn close_summary(&mut self) {
        self.summary = None;
    }

    fn refresh_summary(&mut self) {
        let Some(device_id) = self.summary.as_ref().map(|s| s.device_id.clone()) else {
            return;
        };
        if self.analyze_device(&device_id).is_err() {
            self.summary = None;
        }
    }

    // ===== EXPORT =====

    /// Table of `sensors` (default selection when `None`)
    pub fn export(&self, device_id: &str, sensors: Option<&[String]>) -> FleetResult<ExportTable> {
        let record = self.require(device_id)?;
        let sensors = sensors.unwrap_or_else(|| record.default_selection());
        Ok(ExportTable::from_record(record, sensors, &self.registry))
    }

    /// Write the export table of a device as CSV
    pub fn export_csv<W: Write>(
        &self,
        device_id: &str,
        sensors: Option<&[String]>,
        writer: W,
    ) -> FleetResult<()> {
        self.export(device_id, sensors)?.write_csv(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{CalibrationSnapshot, MemoryCalibrationStore};
    use crate::errors::{CalibrationError, CalibrationResult};
    use crate::ingest::DeviceBatch;
    use crate::reading::{Reading, SensorValues};
    use crate::time::FixedTime;
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn weight_batch() -> Batch {
        let readings = (0..4u64)
            .map(|i| {
                Reading::new(
                    i * 60_000,
                    SensorValues::new().with("weightRaw", Some(100.0 + i as f64)),
                )
            })
            .collect();
        Batch::new()
            .with_device("TRUCK-1", DeviceBatch::new(readings))
            .with_device("EMPTY", DeviceBatch::default())
    }

    struct FailingStore;

    impl CalibrationStore for FailingStore {
        fn load(&self) -> CalibrationResult<Option<CalibrationSnapshot>> {
            Err(CalibrationError::Store("disk gone".into()))
        }

        fn save(&mut self, _: &CalibrationSnapshot) -> CalibrationResult<()> {
            Err(CalibrationError::Store("disk gone".into()))
        }
    }

    #[test]
    fn ingest_skips_empty_devices() {
        let mut fleet = Fleet::new().with_clock(Box::new(FixedTime::new(42)));
        let report = fleet.ingest(weight_batch());

        assert_eq!(report.accepted, ["TRUCK-1"]);
        assert_eq!(report.warnings, [CatalogError::empty_device("EMPTY")]);
        assert_eq!(fleet.devices().len(), 1);
        assert_eq!(fleet.device("TRUCK-1").unwrap().metadata.last_update, 42);
    }

    #[test]
    fn last_seen_uses_fleet_clock() {
        let two_hours = 2 * 3_600_000;
        let batch = Batch::new().with_device(
            "TRUCK-1",
            DeviceBatch::new(vec![Reading::new(0, SensorValues::new().with("spd", Some(1.0)))])
                .with_last_update(1_000),
        );
        let mut fleet = Fleet::new().with_clock(Box::new(FixedTime::new(1_000 + two_hours)));
        fleet.ingest(batch);

        assert_eq!(fleet.last_seen("TRUCK-1").unwrap(), "2h ago");
        assert!(matches!(fleet.last_seen("NOPE"), Err(FleetError::UnknownDevice(_))));
    }

    #[test]
    fn empty_batch_warns() {
        let mut fleet = Fleet::new();
        let report = fleet.ingest(Batch::new());
        assert_eq!(report.warnings, [CatalogError::empty_batch()]);
        assert!(fleet.devices().is_empty());
    }

    #[test]
    fn calibration_edits_recompute_records() {
        let mut fleet = Fleet::new();
        fleet.ingest(weight_batch());
        // Identity until two points exist
        assert_eq!(
            fleet.device("TRUCK-1").unwrap().stats("weightCalibrated").unwrap().latest,
            103.0
        );

        fleet.add_calibration_point(0.0, 0.0).unwrap();
        fleet.add_calibration_point(100.0, 50.0).unwrap();
        fleet.set_target_unit(WeightUnit::Kilogram);

        let stats = fleet.device("TRUCK-1").unwrap().stats("weightCalibrated").unwrap();
        assert_relative_eq!(stats.latest, 51.5);
        assert_eq!(stats.unit, "kg");
        assert_eq!(fleet.registry().unit("weightCalibrated"), "kg");
    }

    #[derive(Clone, Default)]
    struct SharedStore(Rc<RefCell<MemoryCalibrationStore>>);

    impl CalibrationStore for SharedStore {
        fn load(&self) -> CalibrationResult<Option<CalibrationSnapshot>> {
            self.0.borrow().load()
        }

        fn save(&mut self, snapshot: &CalibrationSnapshot) -> CalibrationResult<()> {
            self.0.borrow_mut().save(snapshot)
        }
    }

    #[test]
    fn calibration_is_persisted() {
        let store = SharedStore::default();
        let mut fleet = Fleet::new().with_store(Box::new(store.clone()));
        fleet.add_calibration_point(0.0, 0.0).unwrap();
        fleet.add_calibration_point(10.0, 20.0).unwrap();
        // Rejected edits are not saved
        assert!(fleet.remove_calibration_point(5).is_err());

        let inner = store.0.borrow();
        assert_eq!(inner.save_count(), 2);
        assert_eq!(inner.snapshot().unwrap().points, fleet.calibration().points());
    }

    #[test]
    fn store_failures_do_not_block_edits() {
        let mut fleet = Fleet::new().with_store(Box::new(FailingStore));
        fleet.add_calibration_point(0.0, 0.0).unwrap();
        fleet.add_calibration_point(10.0, 20.0).unwrap();

        assert_relative_eq!(fleet.convert_weight(5.0, &WeightUnit::MilliVolt), 10.0);
    }

    #[test]
    fn stored_calibration_loaded_at_startup() {
        let store = MemoryCalibrationStore::with_snapshot(CalibrationSnapshot {
            points: vec![ControlPoint::new(0.0, 0.0), ControlPoint::new(1.0, 1000.0)],
            target_unit: WeightUnit::Ton,
        });
        let fleet = Fleet::new().with_store(Box::new(store));

        assert_eq!(fleet.calibration().target_unit(), &WeightUnit::Ton);
        assert_eq!(fleet.registry().unit("weightCalibrated"), "tons");
        assert_relative_eq!(fleet.convert_weight(1.0, &WeightUnit::MilliVolt), 1.0);
    }

    #[test]
    fn summary_follows_segmentation_changes() {
        let mut fleet = Fleet::new();
        fleet.ingest(weight_batch());

        let events = fleet.analyze_device("TRUCK-1").unwrap();
        // 3 minutes of data, 5 minute default
        assert!(events.is_empty());

        fleet.set_min_duration_minutes(2.0).unwrap();
        let summary = fleet.current_summary().unwrap();
        assert_eq!(summary.get("weightRaw").unwrap().total_events, 1);

        assert!(fleet.set_grouping_threshold_percent(f64::NAN).is_err());
        assert!(matches!(
            fleet.analyze_device("NOPE"),
            Err(FleetError::UnknownDevice(_))
        ));
    }

    #[test]
    fn export_uses_default_selection() {
        let mut fleet = Fleet::new();
        fleet.ingest(weight_batch());

        let table = fleet.export("TRUCK-1", None).unwrap();
        assert_eq!(
            table.headers,
            ["Time", "Weight Raw (V)", "Weight Calibrated (mV)"]
        );

        let mut out = Vec::new();
        fleet.export_csv("TRUCK-1", None, &mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with("Time,"));
    }
}
