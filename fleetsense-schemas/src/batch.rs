//! Batch document decoding

use std::fmt;
use std::fs;
use std::path::Path;

use fleetsense_core::constants::{CAPTURE_TIME_KEY, RECEIVED_TIME_KEY};
use fleetsense_core::{
    Batch, DateRange, DeviceBatch, DeviceMetadataInput, Reading, SensorValues, Timestamp,
};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{SchemaError, SchemaResult};

#[derive(Debug, Default, Deserialize)]
struct BatchDocument {
    #[serde(default)]
    date: Value,
    #[serde(default)]
    devices: Map<String, Value>,
}

/// Something dropped or ignored while decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointWarning {
    /// Point is not a JSON object
    NotAnObject { device_id: String, index: usize },
    /// `dtt` missing, negative or not a number
    MissingCaptureTime { device_id: String, index: usize },
    /// `points` is present but not an array
    PointsNotAnArray { device_id: String },
    /// Device entry is not an object, decoded without readings
    MalformedDevice { device_id: String },
    /// Metadata field with a non-string value, ignored
    InvalidMetadata { device_id: String, field: &'static str },
}

impl fmt::Display for PointWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointWarning::NotAnObject { device_id, index } => {
                write!(f, "device {device_id}: point {index} is not an object")
            }
            PointWarning::MissingCaptureTime { device_id, index } => {
                write!(f, "device {device_id}: point {index} has no numeric {CAPTURE_TIME_KEY}")
            }
            PointWarning::PointsNotAnArray { device_id } => {
                write!(f, "device {device_id}: points is not an array")
            }
            PointWarning::MalformedDevice { device_id } => {
                write!(f, "device {device_id}: entry is not an object")
            }
            PointWarning::InvalidMetadata { device_id, field } => {
                write!(f, "device {device_id}: metadata {field} is not a string")
            }
        }
    }
}

/// Decoded batch plus everything that was dropped on the way
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBatch {
    /// Devices ready for ingest
    pub batch: Batch,
    /// Dropped points and ignored fields, in document order
    pub warnings: Vec<PointWarning>,
}

/// Decode a batch document from a JSON string
pub fn parse_batch(json: &str) -> SchemaResult<DecodedBatch> {
    decode_batch(serde_json::from_str(json)?)
}

/// Read and decode a batch document file
pub fn read_batch(path: impl AsRef<Path>) -> SchemaResult<DecodedBatch> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    parse_batch(&json)
}

/// Decode an already parsed JSON value
pub fn decode_batch(value: Value) -> SchemaResult<DecodedBatch> {
    let document: BatchDocument = serde_json::from_value(value)?;
    let mut warnings = Vec::new();

    let mut batch = Batch::new();
    for (device_id, device) in document.devices {
        let decoded = decode_device(&device_id, device, &mut warnings);
        batch = batch.with_device(device_id, decoded);
    }

    if let Value::Object(date) = &document.date {
        batch = batch.with_date(DateRange {
            from: date.get("from").and_then(label),
            to: date.get("to").and_then(label),
            interval: date.get("interval").and_then(label),
        });
    }

    for warning in &warnings {
        log::warn!("Batch decode: {}", warning);
    }
    Ok(DecodedBatch { batch, warnings })
}

fn decode_device(
    device_id: &str,
    device: Value,
    warnings: &mut Vec<PointWarning>,
) -> DeviceBatch {
    let Value::Object(mut device) = device else {
        warnings.push(PointWarning::MalformedDevice {
            device_id: device_id.to_string(),
        });
        return DeviceBatch::default();
    };

    let points = match device.remove("points") {
        Some(Value::Array(points)) => points,
        None | Some(Value::Null) => Vec::new(),
        Some(_) => {
            warnings.push(PointWarning::PointsNotAnArray {
                device_id: device_id.to_string(),
            });
            Vec::new()
        }
    };

    let mut readings = Vec::with_capacity(points.len());
    for (index, point) in points.into_iter().enumerate() {
        let Value::Object(point) = point else {
            warnings.push(PointWarning::NotAnObject {
                device_id: device_id.to_string(),
                index,
            });
            continue;
        };
        match decode_point(point) {
            Some(reading) => readings.push(reading),
            None => warnings.push(PointWarning::MissingCaptureTime {
                device_id: device_id.to_string(),
                index,
            }),
        }
    }

    let metadata = device.get("metadata").and_then(Value::as_object);
    let mut text = |field: &'static str| -> Option<String> {
        match metadata?.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            _ => {
                warnings.push(PointWarning::InvalidMetadata {
                    device_id: device_id.to_string(),
                    field,
                });
                None
            }
        }
    };
    let metadata = DeviceMetadataInput {
        weight_unit: text("weightUnit").map(Into::into),
        device_type: text("deviceType"),
        location: text("location"),
    };

    DeviceBatch {
        readings,
        last_update: device.get("lastUpdate").and_then(timestamp),
        metadata,
    }
}

fn decode_point(point: Map<String, Value>) -> Option<Reading> {
    let captured = point.get(CAPTURE_TIME_KEY).and_then(timestamp)?;
    let received = point
        .get(RECEIVED_TIME_KEY)
        .and_then(timestamp)
        .unwrap_or(captured);

    let values: SensorValues = point
        .into_iter()
        .filter(|(key, _)| key != CAPTURE_TIME_KEY && key != RECEIVED_TIME_KEY)
        .map(|(key, value)| (key, value.as_f64()))
        .collect();

    Some(Reading::new(captured, values).with_received(received))
}

/// Millisecond timestamp from a JSON number, fractional values rounded
fn timestamp(value: &Value) -> Option<Timestamp> {
    if let Some(ms) = value.as_u64() {
        return Some(ms);
    }
    let ms = value.as_f64()?;
    (ms.is_finite() && ms >= 0.0 && ms <= u64::MAX as f64).then(|| ms.round() as Timestamp)
}

fn label(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
