//! Live record list service
//!
//! Owns the in-memory view of one scope's records: consumes full-snapshot
//! events from the store subscription, replaces the list wholesale
//! (normalize + sort on every snapshot), and orchestrates the edit and
//! delete flows. The edit session and the pending delete confirmation are
//! local state, deliberately isolated from the subscription stream - an
//! incoming snapshot never clobbers uncommitted edits.

use std::sync::mpsc::{Receiver, TryRecvError};

use serde_json::Value;
use tracing::debug;

use servicebook_domain::{
    catalog, normalize_record, sort_newest_first, DeleteConfirmation, EditSession, FieldEdit,
    RecordStore, ServiceCategory, ServiceFlag,
};
use servicebook_types::{
    BrakePercentages, Document, DriveMode, Error, Gearbox, MotivePower, Result, SnapshotEvent,
    SubscriptionError, VehicleRecord,
};

/// Scalar form input for registering a new record.
///
/// Service checklists, scanning and brakes always start from their catalog
/// defaults; they are edited afterwards.
#[derive(Debug, Clone, Default)]
pub struct NewRecordInput {
    pub reg_number: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub kilometers: String,
    pub gearbox: Option<Gearbox>,
    pub motive_power: Option<MotivePower>,
    pub drive_mode: Option<DriveMode>,
}

/// The live record list plus the edit/delete state of one viewer
pub struct RecordListService {
    store: Box<dyn RecordStore>,
    scope: String,
    subscription: Receiver<SnapshotEvent>,
    records: Vec<VehicleRecord>,
    subscription_error: Option<SubscriptionError>,
    editor: Option<EditSession>,
    pending_delete: DeleteConfirmation,
}

impl RecordListService {
    /// Subscribe to `scope` on `store` and consume the initial snapshot
    pub fn new(store: Box<dyn RecordStore>, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        let subscription = store.subscribe(&scope);
        let mut service = Self {
            store,
            scope,
            subscription,
            records: Vec::new(),
            subscription_error: None,
            editor: None,
            pending_delete: DeleteConfirmation::Idle,
        };
        service.refresh();
        service
    }

    /// Drain pending subscription events and apply the latest snapshot.
    ///
    /// A subscription error is terminal: it is remembered for
    /// [`subscription_error`](Self::subscription_error) and the last known
    /// list stays visible.
    pub fn refresh(&mut self) {
        let mut latest = None;
        loop {
            match self.subscription.try_recv() {
                Ok(SnapshotEvent::Snapshot(documents)) => latest = Some(documents),
                Ok(SnapshotEvent::Error(e)) => {
                    self.subscription_error = Some(e);
                    break;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.subscription_error.is_none() {
                        self.subscription_error = Some(SubscriptionError::Closed);
                    }
                    break;
                }
            }
        }
        if let Some(documents) = latest {
            self.apply_snapshot(documents);
        }
    }

    /// Replace the in-memory list with a full snapshot.
    ///
    /// Normalization and the newest-first sort are reapplied here, on every
    /// snapshot. The editor and pending-delete state are untouched.
    fn apply_snapshot(&mut self, documents: Vec<Document>) {
        let mut records: Vec<VehicleRecord> = documents
            .iter()
            .map(|doc| normalize_record(&doc.id, &doc.data))
            .collect();
        sort_newest_first(&mut records);
        debug!(count = records.len(), "snapshot applied");
        self.records = records;
    }

    /// Records in display order (newest first)
    pub fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&VehicleRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Terminal subscription failure, if one has occurred
    pub fn subscription_error(&self) -> Option<&SubscriptionError> {
        self.subscription_error.as_ref()
    }

    /// Register a new record with catalog-default checklists
    pub fn register(&mut self, input: NewRecordInput, user_id: &str) -> Result<String> {
        let record = VehicleRecord {
            id: String::new(),
            reg_number: input.reg_number,
            brand: input.brand,
            model: input.model,
            year: input.year,
            kilometers: input.kilometers,
            gearbox: input.gearbox,
            motive_power: input.motive_power,
            drive_mode: input.drive_mode,
            engine_services: catalog::engine_defaults(),
            chassis_services: catalog::chassis_defaults(),
            vehicle_scanning: catalog::scanning_default(),
            brake_percentages: BrakePercentages::default(),
            additional_info: String::new(),
            user_id: user_id.to_string(),
            timestamp: None,
        };
        let document = record.to_document()?;
        let id = self.store.create(&self.scope, document)?;
        self.refresh();
        Ok(id)
    }

    /// Bulk-load raw documents (legacy backup shape) into the store
    pub fn import_documents(&mut self, documents: Vec<Value>) -> Result<usize> {
        let count = documents.len();
        for document in documents {
            self.store.create(&self.scope, document)?;
        }
        self.refresh();
        Ok(count)
    }

    /// Start editing a record; replaces any previously open session
    pub fn begin_edit(&mut self, id: &str) -> Result<()> {
        let record = self
            .get(id)
            .ok_or_else(|| Error::RecordNotFound(id.to_string()))?;
        self.editor = Some(EditSession::begin(record));
        Ok(())
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.editor.as_ref()
    }

    pub fn apply_edit(&mut self, edit: FieldEdit) -> Result<()> {
        let session = self.editor.as_mut().ok_or(Error::NoEditSession)?;
        session.apply(edit);
        Ok(())
    }

    pub fn toggle_service_flag(
        &mut self,
        category: ServiceCategory,
        index: usize,
        flag: ServiceFlag,
    ) -> Result<()> {
        let session = self.editor.as_mut().ok_or(Error::NoEditSession)?;
        session.toggle_service_flag(category, index, flag);
        Ok(())
    }

    /// Persist the edited record as a whole-document overwrite.
    ///
    /// A failed save returns the error and leaves the session open with the
    /// edits intact - the user retries or cancels explicitly; a failed save
    /// never exits edit mode.
    pub fn save_edit(&mut self) -> Result<VehicleRecord> {
        let session = self.editor.as_ref().ok_or(Error::NoEditSession)?;
        let record = session.commit();
        let document = record.to_document()?;
        self.store.update(&self.scope, &record.id, document)?;
        self.editor = None;
        self.refresh();
        Ok(record)
    }

    /// Discard the edit session; no store side effect
    pub fn cancel_edit(&mut self) {
        self.editor = None;
    }

    /// Arm the two-step delete confirmation for a record
    pub fn request_delete(&mut self, id: &str) {
        self.pending_delete.request(id);
    }

    /// Record id currently awaiting delete confirmation
    pub fn pending_delete(&self) -> Option<&str> {
        self.pending_delete.pending_id()
    }

    /// Execute the pending delete.
    ///
    /// Returns the deleted id, or `None` when nothing was pending. On store
    /// failure the confirmation stays armed for a retry.
    pub fn confirm_delete(&mut self) -> Result<Option<String>> {
        let Some(id) = self.pending_delete.pending_id().map(str::to_string) else {
            return Ok(None);
        };
        self.store.delete(&self.scope, &id)?;
        self.pending_delete.confirm();
        self.refresh();
        Ok(Some(id))
    }

    /// Drop the delete intent with no side effect
    pub fn cancel_delete(&mut self) {
        self.pending_delete.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use servicebook_domain::{BrakeCorner, ScalarField};
    use servicebook_store::FileRecordStore;
    use servicebook_types::PersistenceError;
    use std::cell::RefCell;
    use std::sync::mpsc::{channel, Sender};

    const SCOPE: &str = "artifacts/test-app/public/data/vehicleServices";

    fn file_service(dir: &tempfile::TempDir) -> RecordListService {
        let store = FileRecordStore::open(dir.path().to_path_buf()).unwrap();
        RecordListService::new(Box::new(store), SCOPE)
    }

    fn register_sample(service: &mut RecordListService, reg: &str) -> String {
        service
            .register(
                NewRecordInput {
                    reg_number: reg.to_string(),
                    brand: "Volvo".to_string(),
                    model: "V70".to_string(),
                    year: "2014".to_string(),
                    kilometers: "180000".to_string(),
                    gearbox: Some(Gearbox::Manual),
                    motive_power: Some(MotivePower::Diesel),
                    drive_mode: Some(DriveMode::Front),
                },
                "user-1",
            )
            .unwrap()
    }

    /// Store stub whose writes always fail; the subscription serves one
    /// seeded record
    struct FailingStore {
        seeded: Vec<Document>,
        subscribers: RefCell<Vec<Sender<SnapshotEvent>>>,
    }

    impl FailingStore {
        fn with_record(id: &str) -> Self {
            Self {
                seeded: vec![Document {
                    id: id.to_string(),
                    data: json!({ "regNumber": "ABC-123", "brand": "Volvo" }),
                }],
                subscribers: RefCell::new(Vec::new()),
            }
        }
    }

    impl RecordStore for FailingStore {
        fn subscribe(&self, _scope: &str) -> Receiver<SnapshotEvent> {
            let (sender, receiver) = channel();
            let _ = sender.send(SnapshotEvent::Snapshot(self.seeded.clone()));
            self.subscribers.borrow_mut().push(sender);
            receiver
        }

        fn create(&self, _scope: &str, _data: Value) -> std::result::Result<String, PersistenceError> {
            Err(PersistenceError::WriteFailed("backend unavailable".to_string()))
        }

        fn update(
            &self,
            _scope: &str,
            _id: &str,
            _data: Value,
        ) -> std::result::Result<(), PersistenceError> {
            Err(PersistenceError::WriteFailed("backend unavailable".to_string()))
        }

        fn delete(&self, _scope: &str, _id: &str) -> std::result::Result<(), PersistenceError> {
            Err(PersistenceError::WriteFailed("backend unavailable".to_string()))
        }
    }

    #[test]
    fn test_list_is_sorted_newest_first_on_every_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);

        let first = register_sample(&mut service, "AAA-111");
        let second = register_sample(&mut service, "BBB-222");

        let ids: Vec<&str> = service.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        // both records share a creation second at worst; the newer one must
        // not sort before the older only by map order
        assert!(ids.contains(&first.as_str()));
        assert!(ids.contains(&second.as_str()));
        for pair in service.records().windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_failed_save_keeps_the_session_and_edits() {
        let mut service =
            RecordListService::new(Box::new(FailingStore::with_record("rec-1")), SCOPE);
        assert_eq!(service.records().len(), 1);

        service.begin_edit("rec-1").unwrap();
        service
            .apply_edit(FieldEdit::Scalar(ScalarField::Brand, "Saab".to_string()))
            .unwrap();

        let err = service.save_edit().unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));

        // still in edit mode, edits intact
        let session = service.edit_session().expect("session preserved");
        assert_eq!(session.record().brand, "Saab");

        // the live list was not touched by the failed save
        assert_eq!(service.records()[0].brand, "Volvo");
    }

    #[test]
    fn test_failed_delete_keeps_the_confirmation_armed() {
        let mut service =
            RecordListService::new(Box::new(FailingStore::with_record("rec-1")), SCOPE);

        service.request_delete("rec-1");
        let err = service.confirm_delete().unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(service.pending_delete(), Some("rec-1"));

        service.cancel_delete();
        assert_eq!(service.pending_delete(), None);
    }

    #[test]
    fn test_deleting_one_record_leaves_another_edit_buffer_intact() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);
        let x = register_sample(&mut service, "XXX-111");
        let y = register_sample(&mut service, "YYY-222");

        service.begin_edit(&y).unwrap();
        service
            .apply_edit(FieldEdit::BrakeCorner(BrakeCorner::FrontLeft, "61".to_string()))
            .unwrap();

        service.request_delete(&x);
        assert_eq!(service.confirm_delete().unwrap(), Some(x.clone()));

        assert!(service.get(&x).is_none());
        let session = service.edit_session().expect("edit session survives");
        assert_eq!(session.record_id(), y);
        assert_eq!(session.record().brake_percentages.front_left, "61");
    }

    #[test]
    fn test_snapshot_replacement_preserves_uncommitted_edits() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);
        let edited = register_sample(&mut service, "AAA-111");

        service.begin_edit(&edited).unwrap();
        service
            .apply_edit(FieldEdit::Scalar(ScalarField::Kilometers, "185000".to_string()))
            .unwrap();

        // a new registration replaces the whole list via the subscription
        register_sample(&mut service, "BBB-222");
        assert_eq!(service.records().len(), 2);

        let session = service.edit_session().expect("edit session survives");
        assert_eq!(session.record().kilometers, "185000");
        // the live copy still shows the stored value until save
        assert_eq!(service.get(&edited).unwrap().kilometers, "180000");
    }

    #[test]
    fn test_save_merges_into_the_live_list_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);
        let id = register_sample(&mut service, "AAA-111");

        service.begin_edit(&id).unwrap();
        service
            .apply_edit(FieldEdit::Scalar(ScalarField::Brand, "Saab".to_string()))
            .unwrap();
        let saved = service.save_edit().unwrap();

        assert_eq!(saved.brand, "Saab");
        assert!(service.edit_session().is_none());
        assert_eq!(service.get(&id).unwrap().brand, "Saab");
        // identity fields survived the whole-document overwrite
        assert_eq!(service.get(&id).unwrap().user_id, "user-1");
        assert!(service.get(&id).unwrap().timestamp.is_some());
    }

    #[test]
    fn test_import_preserves_legacy_timestamps() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);

        let imported = service
            .import_documents(vec![
                json!({ "regNumber": "OLD-001", "timestamp": "2020-01-01T00:00:00Z" }),
                json!({ "regNumber": "OLD-002" }),
            ])
            .unwrap();
        assert_eq!(imported, 2);

        let old = service
            .records()
            .iter()
            .find(|r| r.reg_number == "OLD-001")
            .unwrap();
        assert_eq!(old.timestamp.unwrap().timestamp(), 1_577_836_800);
        // the record without a timestamp got one assigned by the store
        let other = service
            .records()
            .iter()
            .find(|r| r.reg_number == "OLD-002")
            .unwrap();
        assert!(other.timestamp.is_some());
    }

    #[test]
    fn test_edit_without_session_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);
        let err = service
            .apply_edit(FieldEdit::ScanType("OBD".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::NoEditSession));
        assert!(matches!(service.save_edit().unwrap_err(), Error::NoEditSession));
    }

    #[test]
    fn test_begin_edit_unknown_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = file_service(&dir);
        assert!(matches!(
            service.begin_edit("missing").unwrap_err(),
            Error::RecordNotFound(_)
        ));
    }
}
