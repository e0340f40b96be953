//! Repository trait definitions for the record store and identity

use std::sync::mpsc::Receiver;

use serde_json::Value;
use servicebook_types::{PersistenceError, SnapshotEvent};

/// Shared document store holding the vehicle service records of one
/// deployment, scoped by a tenant path prefix.
///
/// Writes are last-write-wins whole-document overwrites; there is no version
/// field and no optimistic-concurrency check.
pub trait RecordStore {
    /// Open a live query over all records under `scope`.
    ///
    /// The receiver gets the complete current record set immediately, then a
    /// fresh full snapshot after every mutation. An error event is terminal.
    fn subscribe(&self, scope: &str) -> Receiver<SnapshotEvent>;

    /// Create a record; the store assigns the id and the creation timestamp
    fn create(&self, scope: &str, data: Value) -> Result<String, PersistenceError>;

    /// Overwrite the whole document body of an existing record
    fn update(&self, scope: &str, id: &str, data: Value) -> Result<(), PersistenceError>;

    /// Destroy a record; irreversible, the id is never reused
    fn delete(&self, scope: &str, id: &str) -> Result<(), PersistenceError>;
}

/// Identity source backing record ownership
pub trait IdentityProvider {
    /// Stable user id, available once sign-in has completed
    fn current_user_id(&self) -> Option<String>;
}
