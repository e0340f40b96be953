//! Record normalizer
//!
//! Stored documents are schemaless; older records predate the scanning,
//! brake and additional-info fields. Normalization fills those gaps with
//! defaults and produces a [`VehicleRecord`] satisfying the data-model
//! invariants. Total over arbitrary document shapes - a malformed field
//! degrades to its default, never to an error.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use servicebook_types::{
    BrakePercentages, DriveMode, Gearbox, MotivePower, ServiceItem, VehicleRecord,
};

use crate::catalog;

/// Normalize a raw stored document into a `VehicleRecord`
pub fn normalize_record(id: &str, data: &Value) -> VehicleRecord {
    VehicleRecord {
        id: id.to_string(),
        reg_number: string_field(data, "regNumber"),
        brand: string_field(data, "brand"),
        model: string_field(data, "model"),
        year: string_field(data, "year"),
        kilometers: string_field(data, "kilometers"),
        gearbox: Gearbox::from_stored(&string_field(data, "gearbox")),
        motive_power: MotivePower::from_stored(&string_field(data, "motivePower")),
        drive_mode: DriveMode::from_stored(&string_field(data, "driveMode")),
        // Service lists pass through as stored; no catalog re-sync here.
        // Absent lists stay empty - display mode renders them as such.
        engine_services: service_items(data.get("engineServices")),
        chassis_services: service_items(data.get("chassisServices")),
        vehicle_scanning: normalize_scanning(data.get("vehicleScanning")),
        brake_percentages: normalize_brakes(data.get("brakePercentages")),
        additional_info: string_field(data, "additionalInfo"),
        user_id: string_field(data, "userId"),
        timestamp: parse_timestamp(data.get("timestamp")),
    }
}

/// Read a field as text; numbers are stringified, anything else is empty
fn string_field(data: &Value, key: &str) -> String {
    match data.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn bool_field(item: &Value, key: &str) -> bool {
    item.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn service_items(value: Option<&Value>) -> Vec<ServiceItem> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .map(|item| ServiceItem {
            service_type: match item.get("type") {
                Some(Value::String(s)) => s.clone(),
                _ => String::new(),
            },
            done: bool_field(item, "done"),
            urgent: bool_field(item, "urgent"),
            later: bool_field(item, "later"),
        })
        .collect()
}

/// Scanning always holds exactly one entry after normalization
fn normalize_scanning(value: Option<&Value>) -> Vec<ServiceItem> {
    let items = service_items(value);
    if items.is_empty() {
        catalog::scanning_default()
    } else {
        items
    }
}

/// All four wheels present after normalization, defaulting to empty strings
fn normalize_brakes(value: Option<&Value>) -> BrakePercentages {
    let Some(Value::Object(map)) = value else {
        return BrakePercentages::default();
    };
    let corner = |key: &str| match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    BrakePercentages {
        front_left: corner("frontLeft"),
        front_right: corner("frontRight"),
        rear_left: corner("rearLeft"),
        rear_right: corner("rearRight"),
    }
}

/// Creation time as stored: RFC 3339 text or epoch milliseconds
fn parse_timestamp(value: Option<&Value>) -> Option<DateTime<Utc>> {
    match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc)),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}
