//! Record editor
//!
//! An edit session stages a deep, independent copy of one record. The live
//! list is never aliased into the session; snapshot replacements and deletes
//! of other records leave an open session untouched, and the session merges
//! back into the store only on an explicit, successful save.

use servicebook_types::{DriveMode, Gearbox, MotivePower, VehicleRecord};

use crate::catalog;

/// Top-level scalar fields addressable by an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarField {
    RegNumber,
    Brand,
    Model,
    Year,
    Kilometers,
    Gearbox,
    MotivePower,
    DriveMode,
    AdditionalInfo,
}

/// One wheel of the brake test grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrakeCorner {
    FrontLeft,
    FrontRight,
    RearLeft,
    RearRight,
}

/// A single field mutation.
///
/// Deliberately not a generic path setter: these three addressing modes are
/// the only supported ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Set a top-level scalar field
    Scalar(ScalarField, String),
    /// Set one brake wheel, preserving the other three
    BrakeCorner(BrakeCorner, String),
    /// Set the type of the single scanning entry
    ScanType(String),
}

/// Service checklist categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceCategory {
    Engine,
    Chassis,
    Scanning,
}

/// The three non-exclusive status flags of a service item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFlag {
    Done,
    Urgent,
    Later,
}

/// Working copy of one record during editing
#[derive(Debug, Clone)]
pub struct EditSession {
    record: VehicleRecord,
}

impl EditSession {
    /// Start editing a record.
    ///
    /// Deep-copies the record and brings legacy records up to the editing
    /// invariants: empty engine/chassis lists become full catalog defaults,
    /// an empty scanning list becomes the single default entry.
    pub fn begin(record: &VehicleRecord) -> Self {
        let mut record = record.clone();
        if record.engine_services.is_empty() {
            record.engine_services = catalog::engine_defaults();
        }
        if record.chassis_services.is_empty() {
            record.chassis_services = catalog::chassis_defaults();
        }
        if record.vehicle_scanning.is_empty() {
            record.vehicle_scanning = catalog::scanning_default();
        }
        Self { record }
    }

    pub fn record_id(&self) -> &str {
        &self.record.id
    }

    /// The in-progress edit buffer
    pub fn record(&self) -> &VehicleRecord {
        &self.record
    }

    /// Apply one field mutation to the working copy
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Scalar(field, value) => match field {
                ScalarField::RegNumber => self.record.reg_number = value,
                ScalarField::Brand => self.record.brand = value,
                ScalarField::Model => self.record.model = value,
                ScalarField::Year => self.record.year = value,
                ScalarField::Kilometers => self.record.kilometers = value,
                ScalarField::Gearbox => self.record.gearbox = Gearbox::from_stored(&value),
                ScalarField::MotivePower => {
                    self.record.motive_power = MotivePower::from_stored(&value)
                }
                ScalarField::DriveMode => self.record.drive_mode = DriveMode::from_stored(&value),
                ScalarField::AdditionalInfo => self.record.additional_info = value,
            },
            FieldEdit::BrakeCorner(corner, value) => {
                let brakes = &mut self.record.brake_percentages;
                match corner {
                    BrakeCorner::FrontLeft => brakes.front_left = value,
                    BrakeCorner::FrontRight => brakes.front_right = value,
                    BrakeCorner::RearLeft => brakes.rear_left = value,
                    BrakeCorner::RearRight => brakes.rear_right = value,
                }
            }
            FieldEdit::ScanType(value) => {
                if let Some(entry) = self.record.vehicle_scanning.first_mut() {
                    entry.service_type = value;
                }
            }
        }
    }

    /// Flip one status flag at `category[index]`.
    ///
    /// Out-of-bounds indices are a silent no-op; the type and the other two
    /// flags are untouched either way.
    pub fn toggle_service_flag(&mut self, category: ServiceCategory, index: usize, flag: ServiceFlag) {
        let items = match category {
            ServiceCategory::Engine => &mut self.record.engine_services,
            ServiceCategory::Chassis => &mut self.record.chassis_services,
            ServiceCategory::Scanning => &mut self.record.vehicle_scanning,
        };
        let Some(item) = items.get_mut(index) else {
            return;
        };
        match flag {
            ServiceFlag::Done => item.done = !item.done,
            ServiceFlag::Urgent => item.urgent = !item.urgent,
            ServiceFlag::Later => item.later = !item.later,
        }
    }

    /// The full edited record, to be written as a whole-document overwrite.
    ///
    /// Every field is included, changed or not. The session itself stays
    /// alive; the caller discards it only once the write succeeds.
    pub fn commit(&self) -> VehicleRecord {
        self.record.clone()
    }
}

/// Two-step delete confirmation.
///
/// `Idle -> Pending(record_id) -> Idle`; at most one record is pending at a
/// time, and a new request replaces the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteConfirmation {
    #[default]
    Idle,
    Pending {
        record_id: String,
    },
}

impl DeleteConfirmation {
    /// Register delete intent for a record
    pub fn request(&mut self, record_id: impl Into<String>) {
        *self = DeleteConfirmation::Pending {
            record_id: record_id.into(),
        };
    }

    pub fn pending_id(&self) -> Option<&str> {
        match self {
            DeleteConfirmation::Idle => None,
            DeleteConfirmation::Pending { record_id } => Some(record_id),
        }
    }

    /// Confirm the pending delete, yielding the record id to destroy
    pub fn confirm(&mut self) -> Option<String> {
        match std::mem::take(self) {
            DeleteConfirmation::Idle => None,
            DeleteConfirmation::Pending { record_id } => Some(record_id),
        }
    }

    /// Discard the pending intent with no side effect
    pub fn cancel(&mut self) {
        *self = DeleteConfirmation::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use servicebook_types::{BrakePercentages, ServiceItem};

    fn sample_record() -> VehicleRecord {
        VehicleRecord {
            id: "rec-1".to_string(),
            reg_number: "ABC-123".to_string(),
            brand: "Volvo".to_string(),
            model: "V70".to_string(),
            year: "2014".to_string(),
            kilometers: "180000".to_string(),
            gearbox: Some(Gearbox::Manual),
            motive_power: Some(MotivePower::Diesel),
            drive_mode: Some(DriveMode::Front),
            engine_services: catalog::engine_defaults(),
            chassis_services: catalog::chassis_defaults(),
            vehicle_scanning: catalog::scanning_default(),
            brake_percentages: BrakePercentages {
                front_left: "60".to_string(),
                front_right: "58".to_string(),
                rear_left: "45".to_string(),
                rear_right: "47".to_string(),
            },
            additional_info: "Timing belt due".to_string(),
            user_id: "user-1".to_string(),
            timestamp: None,
        }
    }

    #[test]
    fn test_session_is_independent_of_the_live_record() {
        let live = sample_record();
        let mut session = EditSession::begin(&live);
        session.apply(FieldEdit::Scalar(ScalarField::Brand, "Saab".to_string()));
        session.toggle_service_flag(ServiceCategory::Engine, 0, ServiceFlag::Done);
        session.apply(FieldEdit::BrakeCorner(BrakeCorner::RearRight, "20".to_string()));

        assert_eq!(live.brand, "Volvo");
        assert!(!live.engine_services[0].done);
        assert_eq!(live.brake_percentages.rear_right, "47");
    }

    #[test]
    fn test_begin_fills_catalog_for_legacy_records() {
        let mut legacy = sample_record();
        legacy.engine_services.clear();
        legacy.chassis_services.clear();
        legacy.vehicle_scanning.clear();

        let session = EditSession::begin(&legacy);
        assert_eq!(
            session.record().engine_services.len(),
            catalog::ENGINE_SERVICE_TYPES.len()
        );
        assert_eq!(
            session.record().chassis_services.len(),
            catalog::CHASSIS_SERVICE_TYPES.len()
        );
        assert_eq!(session.record().vehicle_scanning, vec![ServiceItem::blank()]);
        // the legacy record itself is untouched
        assert!(legacy.engine_services.is_empty());
    }

    #[test]
    fn test_brake_corner_edit_changes_only_that_corner() {
        let original = sample_record();
        let mut session = EditSession::begin(&original);
        session.apply(FieldEdit::BrakeCorner(BrakeCorner::RearRight, "52".to_string()));

        let edited = session.commit();
        assert_eq!(edited.brake_percentages.rear_right, "52");

        let mut expected = original.clone();
        expected.brake_percentages.rear_right = "52".to_string();
        assert_eq!(edited, expected);
    }

    #[test]
    fn test_scan_type_edit_targets_index_zero_only() {
        let mut session = EditSession::begin(&sample_record());
        session.apply(FieldEdit::ScanType("OBD full scan".to_string()));

        let edited = session.commit();
        assert_eq!(edited.vehicle_scanning.len(), 1);
        assert_eq!(edited.vehicle_scanning[0].service_type, "OBD full scan");
        assert!(!edited.vehicle_scanning[0].done);
    }

    #[test]
    fn test_toggle_is_self_inverse() {
        let mut session = EditSession::begin(&sample_record());
        let before = session.record().chassis_services[2].clone();

        session.toggle_service_flag(ServiceCategory::Chassis, 2, ServiceFlag::Urgent);
        assert!(session.record().chassis_services[2].urgent);
        assert_eq!(session.record().chassis_services[2].done, before.done);
        assert_eq!(session.record().chassis_services[2].later, before.later);

        session.toggle_service_flag(ServiceCategory::Chassis, 2, ServiceFlag::Urgent);
        assert_eq!(session.record().chassis_services[2], before);
    }

    #[test]
    fn test_toggle_out_of_bounds_is_a_no_op() {
        let mut session = EditSession::begin(&sample_record());
        let before = session.record().clone();

        session.toggle_service_flag(ServiceCategory::Engine, 99, ServiceFlag::Done);
        session.toggle_service_flag(ServiceCategory::Scanning, 1, ServiceFlag::Later);

        assert_eq!(session.record(), &before);
    }

    #[test]
    fn test_enum_scalars_parse_leniently() {
        let mut session = EditSession::begin(&sample_record());
        session.apply(FieldEdit::Scalar(ScalarField::Gearbox, "Auto".to_string()));
        assert_eq!(session.record().gearbox, Some(Gearbox::Auto));

        session.apply(FieldEdit::Scalar(ScalarField::Gearbox, "CVT".to_string()));
        assert_eq!(session.record().gearbox, None);

        session.apply(FieldEdit::Scalar(ScalarField::DriveMode, "4 x 4".to_string()));
        assert_eq!(session.record().drive_mode, Some(DriveMode::FourByFour));
    }

    #[test]
    fn test_commit_returns_the_full_record_and_keeps_identity_fields() {
        let original = sample_record();
        let mut session = EditSession::begin(&original);
        session.apply(FieldEdit::Scalar(ScalarField::Kilometers, "185000".to_string()));

        let edited = session.commit();
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.user_id, original.user_id);
        assert_eq!(edited.timestamp, original.timestamp);
        assert_eq!(edited.kilometers, "185000");
        // unchanged fields are carried along for the whole-document write
        assert_eq!(edited.reg_number, original.reg_number);
    }

    #[test]
    fn test_delete_confirmation_state_machine() {
        let mut confirmation = DeleteConfirmation::default();
        assert_eq!(confirmation.pending_id(), None);
        assert_eq!(confirmation.confirm(), None);

        confirmation.request("rec-1");
        assert_eq!(confirmation.pending_id(), Some("rec-1"));

        // only one record pending at a time; a new request replaces it
        confirmation.request("rec-2");
        assert_eq!(confirmation.pending_id(), Some("rec-2"));

        assert_eq!(confirmation.confirm(), Some("rec-2".to_string()));
        assert_eq!(confirmation, DeleteConfirmation::Idle);

        confirmation.request("rec-3");
        confirmation.cancel();
        assert_eq!(confirmation.pending_id(), None);
    }
}
