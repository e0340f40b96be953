//! File-based record store implementation

use std::cell::RefCell;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use chrono::Utc;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use servicebook_domain::RecordStore;
use servicebook_types::{Document, PersistenceError, Result, SnapshotEvent, SubscriptionError};

/// File-based implementation of `RecordStore`.
///
/// Documents live in one pretty-printed JSON file per scope key under the
/// store directory. Every mutation rewrites the scope file and fans the full
/// record set out to all live subscribers, which is the snapshot-replace
/// model the consumers are written against.
pub struct FileRecordStore {
    store_dir: PathBuf,
    scopes: RefCell<HashMap<String, ScopeState>>,
}

struct ScopeState {
    documents: HashMap<String, Value>,
    subscribers: Vec<Sender<SnapshotEvent>>,
}

impl FileRecordStore {
    /// Create or open a record store rooted at `store_dir`
    pub fn open(store_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&store_dir)?;
        Ok(Self {
            store_dir,
            scopes: RefCell::new(HashMap::new()),
        })
    }

    fn scope_path(&self, scope: &str) -> PathBuf {
        // Scope keys are slash-separated path prefixes; flatten to one file
        let file_name: String = scope
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.store_dir.join(format!("{file_name}.json"))
    }

    /// Load a scope file on first touch; a missing file is an empty scope
    fn scope_state<'a>(
        &self,
        scopes: &'a mut HashMap<String, ScopeState>,
        scope: &str,
    ) -> std::result::Result<&'a mut ScopeState, PersistenceError> {
        match scopes.entry(scope.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let path = self.scope_path(scope);
                let documents = if path.exists() {
                    let file =
                        File::open(&path).map_err(|e| PersistenceError::Io(e.to_string()))?;
                    let reader = BufReader::new(file);
                    serde_json::from_reader(reader).unwrap_or_default()
                } else {
                    HashMap::new()
                };
                Ok(entry.insert(ScopeState {
                    documents,
                    subscribers: Vec::new(),
                }))
            }
        }
    }

    fn persist(&self, scope: &str, documents: &HashMap<String, Value>) -> std::result::Result<(), PersistenceError> {
        let path = self.scope_path(scope);
        let file = File::create(&path).map_err(|e| PersistenceError::Io(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, documents)
            .map_err(|e| PersistenceError::WriteFailed(e.to_string()))
    }

    /// Fan the current full record set out to every live subscriber
    fn notify(state: &mut ScopeState) {
        let snapshot = Self::full_snapshot(state);
        state.subscribers.retain(|subscriber| {
            subscriber
                .send(SnapshotEvent::Snapshot(snapshot.clone()))
                .is_ok()
        });
    }

    fn full_snapshot(state: &ScopeState) -> Vec<Document> {
        state
            .documents
            .iter()
            .map(|(id, data)| Document {
                id: id.clone(),
                data: data.clone(),
            })
            .collect()
    }
}

impl RecordStore for FileRecordStore {
    fn subscribe(&self, scope: &str) -> Receiver<SnapshotEvent> {
        let (sender, receiver) = channel();
        let mut scopes = self.scopes.borrow_mut();
        let state = match self.scope_state(&mut scopes, scope) {
            Ok(state) => state,
            Err(e) => {
                // terminal error event; the receiver never sees a snapshot
                let _ =
                    sender.send(SnapshotEvent::Error(SubscriptionError::Failed(e.to_string())));
                return receiver;
            }
        };
        let _ = sender.send(SnapshotEvent::Snapshot(Self::full_snapshot(state)));
        state.subscribers.push(sender);
        receiver
    }

    fn create(&self, scope: &str, data: Value) -> std::result::Result<String, PersistenceError> {
        let mut scopes = self.scopes.borrow_mut();
        let state = self.scope_state(&mut scopes, scope)?;

        let id = Uuid::new_v4().to_string();
        let mut data = data;
        if let Value::Object(ref mut map) = data {
            // creation time is store-assigned; imported legacy documents
            // keep the timestamp they carry
            map.entry("timestamp")
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));
        }
        state.documents.insert(id.clone(), data);
        self.persist(scope, &state.documents)?;
        debug!(scope, id = %id, "record created");
        Self::notify(state);
        Ok(id)
    }

    fn update(&self, scope: &str, id: &str, data: Value) -> std::result::Result<(), PersistenceError> {
        let mut scopes = self.scopes.borrow_mut();
        let state = self.scope_state(&mut scopes, scope)?;

        if !state.documents.contains_key(id) {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        state.documents.insert(id.to_string(), data);
        self.persist(scope, &state.documents)?;
        debug!(scope, id, "record updated");
        Self::notify(state);
        Ok(())
    }

    fn delete(&self, scope: &str, id: &str) -> std::result::Result<(), PersistenceError> {
        let mut scopes = self.scopes.borrow_mut();
        let state = self.scope_state(&mut scopes, scope)?;

        if state.documents.remove(id).is_none() {
            return Err(PersistenceError::NotFound(id.to_string()));
        }
        self.persist(scope, &state.documents)?;
        debug!(scope, id, "record deleted");
        Self::notify(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SCOPE: &str = "artifacts/test-app/public/data/vehicleServices";

    fn open_store(dir: &tempfile::TempDir) -> FileRecordStore {
        FileRecordStore::open(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn test_create_assigns_id_and_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);

        let id = store.create(SCOPE, json!({ "regNumber": "ABC-123" })).unwrap();
        assert!(!id.is_empty());

        let receiver = store.subscribe(SCOPE);
        let SnapshotEvent::Snapshot(docs) = receiver.recv().unwrap() else {
            panic!("expected snapshot");
        };
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
        assert_eq!(docs[0].data["regNumber"], "ABC-123");
        assert!(docs[0].data["timestamp"].is_string());
    }

    #[test]
    fn test_ids_are_unique_across_creates() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let first = store.create(SCOPE, json!({})).unwrap();
        let second = store.create(SCOPE, json!({})).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_update_overwrites_the_whole_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let id = store
            .create(SCOPE, json!({ "regNumber": "ABC-123", "brand": "Volvo" }))
            .unwrap();

        store.update(SCOPE, &id, json!({ "regNumber": "XYZ-999" })).unwrap();

        let receiver = store.subscribe(SCOPE);
        let SnapshotEvent::Snapshot(docs) = receiver.recv().unwrap() else {
            panic!("expected snapshot");
        };
        assert_eq!(docs[0].data["regNumber"], "XYZ-999");
        // whole-document overwrite: fields absent from the write are gone
        assert!(docs[0].data.get("brand").is_none());
    }

    #[test]
    fn test_update_unknown_id_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let err = store.update(SCOPE, "missing", json!({})).unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
    }

    #[test]
    fn test_delete_removes_and_rejects_unknown() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let id = store.create(SCOPE, json!({})).unwrap();

        store.delete(SCOPE, &id).unwrap();
        let err = store.delete(SCOPE, &id).unwrap_err();
        assert!(matches!(err, PersistenceError::NotFound(_)));
    }

    #[test]
    fn test_subscribe_delivers_initial_and_per_mutation_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let receiver = store.subscribe(SCOPE);

        let SnapshotEvent::Snapshot(initial) = receiver.recv().unwrap() else {
            panic!("expected initial snapshot");
        };
        assert!(initial.is_empty());

        let id = store.create(SCOPE, json!({ "brand": "Saab" })).unwrap();
        let SnapshotEvent::Snapshot(after_create) = receiver.recv().unwrap() else {
            panic!("expected snapshot after create");
        };
        assert_eq!(after_create.len(), 1);

        store.delete(SCOPE, &id).unwrap();
        let SnapshotEvent::Snapshot(after_delete) = receiver.recv().unwrap() else {
            panic!("expected snapshot after delete");
        };
        assert!(after_delete.is_empty());
    }

    #[test]
    fn test_documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = open_store(&dir);
            store.create(SCOPE, json!({ "brand": "Volvo" })).unwrap()
        };

        let store = open_store(&dir);
        let receiver = store.subscribe(SCOPE);
        let SnapshotEvent::Snapshot(docs) = receiver.recv().unwrap() else {
            panic!("expected snapshot");
        };
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, id);
    }

    #[test]
    fn test_scopes_are_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        store.create(SCOPE, json!({})).unwrap();

        let other = store.subscribe("artifacts/other-app/public/data/vehicleServices");
        let SnapshotEvent::Snapshot(docs) = other.recv().unwrap() else {
            panic!("expected snapshot");
        };
        assert!(docs.is_empty());
    }
}
