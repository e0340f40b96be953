//! Vehicle service record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Result, SubscriptionError};

/// One checklist entry of a service section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceItem {
    /// Service type from the fixed catalog, or free text for scanning
    #[serde(rename = "type")]
    pub service_type: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub later: bool,
}

impl ServiceItem {
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            done: false,
            urgent: false,
            later: false,
        }
    }

    /// Default scanning entry (empty free-text type, no flags)
    pub fn blank() -> Self {
        Self::new("")
    }

    pub fn has_active_flag(&self) -> bool {
        self.done || self.urgent || self.later
    }

    /// Labels of the set flags, in fixed done/urgent/later order
    pub fn active_flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.done {
            flags.push("Done");
        }
        if self.urgent {
            flags.push("Urgent");
        }
        if self.later {
            flags.push("Later");
        }
        flags
    }
}

/// Brake test percentages, one numeric-ish field per wheel; empty when unmeasured
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrakePercentages {
    #[serde(default)]
    pub front_left: String,
    #[serde(default)]
    pub front_right: String,
    #[serde(default)]
    pub rear_left: String,
    #[serde(default)]
    pub rear_right: String,
}

/// Gearbox type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gearbox {
    Auto,
    Manual,
}

impl Gearbox {
    pub const ALL: [Gearbox; 2] = [Gearbox::Auto, Gearbox::Manual];

    pub fn label(&self) -> &'static str {
        match self {
            Gearbox::Auto => "Auto",
            Gearbox::Manual => "Manual",
        }
    }

    /// Parse a stored value; unknown or empty strings yield `None`
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "Auto" => Some(Gearbox::Auto),
            "Manual" => Some(Gearbox::Manual),
            _ => None,
        }
    }
}

/// Motive power type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MotivePower {
    Petrol,
    Diesel,
    Gas,
    Hybrid,
    #[serde(rename = "PHEV")]
    Phev,
    #[serde(rename = "HEV")]
    Hev,
}

impl MotivePower {
    pub const ALL: [MotivePower; 6] = [
        MotivePower::Petrol,
        MotivePower::Diesel,
        MotivePower::Gas,
        MotivePower::Hybrid,
        MotivePower::Phev,
        MotivePower::Hev,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MotivePower::Petrol => "Petrol",
            MotivePower::Diesel => "Diesel",
            MotivePower::Gas => "Gas",
            MotivePower::Hybrid => "Hybrid",
            MotivePower::Phev => "PHEV",
            MotivePower::Hev => "HEV",
        }
    }

    /// Parse a stored value; unknown or empty strings yield `None`
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "Petrol" => Some(MotivePower::Petrol),
            "Diesel" => Some(MotivePower::Diesel),
            "Gas" => Some(MotivePower::Gas),
            "Hybrid" => Some(MotivePower::Hybrid),
            "PHEV" => Some(MotivePower::Phev),
            "HEV" => Some(MotivePower::Hev),
            _ => None,
        }
    }
}

/// Drive mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriveMode {
    Rear,
    Front,
    #[serde(rename = "4x4")]
    FourByFour,
}

impl DriveMode {
    pub const ALL: [DriveMode; 3] = [DriveMode::Rear, DriveMode::Front, DriveMode::FourByFour];

    pub fn label(&self) -> &'static str {
        match self {
            DriveMode::Rear => "Rear",
            DriveMode::Front => "Front",
            DriveMode::FourByFour => "4x4",
        }
    }

    /// Parse a stored value; unknown or empty strings yield `None`.
    ///
    /// Legacy records store the spelled-out "4 x 4".
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "Rear" => Some(DriveMode::Rear),
            "Front" => Some(DriveMode::Front),
            "4x4" | "4 x 4" => Some(DriveMode::FourByFour),
            _ => None,
        }
    }
}

/// One vehicle service/inspection record.
///
/// Constructed only by the normalizer (from a raw stored document) or by the
/// registration path; always satisfies the data-model invariants: scanning
/// has exactly one entry, brake percentages carry all four wheels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Store-assigned document id; not part of the document body
    #[serde(skip_serializing)]
    pub id: String,
    pub reg_number: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub kilometers: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gearbox: Option<Gearbox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motive_power: Option<MotivePower>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_mode: Option<DriveMode>,
    pub engine_services: Vec<ServiceItem>,
    pub chassis_services: Vec<ServiceItem>,
    pub vehicle_scanning: Vec<ServiceItem>,
    pub brake_percentages: BrakePercentages,
    pub additional_info: String,
    /// Creator identity, set at registration and never edited
    pub user_id: String,
    /// Store-assigned creation time; immutable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl VehicleRecord {
    /// The single scanning entry, if the record has been normalized
    pub fn scan_entry(&self) -> Option<&ServiceItem> {
        self.vehicle_scanning.first()
    }

    /// Serialize the record body for a whole-document write (id excluded)
    pub fn to_document(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// A raw stored document: store-assigned id plus schemaless body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: serde_json::Value,
}

/// One event on a live record subscription.
///
/// Snapshots always carry the complete record set for the scope; an error
/// event is terminal for the subscription.
#[derive(Debug)]
pub enum SnapshotEvent {
    Snapshot(Vec<Document>),
    Error(SubscriptionError),
}
