//! Repository adapters for the persistence layer

use std::path::PathBuf;

use servicebook_store::{FileRecordStore, StoredIdentity};
use servicebook_types::Result;

use crate::config::Config;

/// Open the file-backed record store for the configured store directory
pub fn open_record_store(config: &Config) -> Result<FileRecordStore> {
    let store_dir = config.store_dir()?;
    FileRecordStore::open(store_dir)
}

/// Open the stored identity provider
pub fn open_identity(config: &Config) -> Result<StoredIdentity> {
    let store_dir = config.store_dir()?;
    StoredIdentity::open(store_dir).map_err(Into::into)
}

/// Open the record store at a custom directory
pub fn open_record_store_at(store_dir: PathBuf) -> Result<FileRecordStore> {
    FileRecordStore::open(store_dir)
}
