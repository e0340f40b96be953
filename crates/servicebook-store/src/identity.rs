//! Stored identity provider
//!
//! Stands in for the managed backend's anonymous/token sign-in: the first
//! anonymous sign-in mints a uid and persists it, so the same machine keeps
//! the same identity across runs.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use servicebook_domain::IdentityProvider;
use servicebook_types::AuthError;

#[derive(Debug, Serialize, Deserialize)]
struct IdentityFile {
    user_id: String,
}

/// File-backed implementation of `IdentityProvider`
pub struct StoredIdentity {
    path: PathBuf,
    user_id: RefCell<Option<String>>,
}

impl StoredIdentity {
    /// Open the identity file under `store_dir`; no sign-in happens yet
    pub fn open(store_dir: PathBuf) -> Result<Self, AuthError> {
        fs::create_dir_all(&store_dir).map_err(|e| AuthError::SignInFailed(e.to_string()))?;
        let path = store_dir.join("identity.json");

        let user_id = if path.exists() {
            let file = File::open(&path).map_err(|e| AuthError::SignInFailed(e.to_string()))?;
            let reader = BufReader::new(file);
            serde_json::from_reader::<_, IdentityFile>(reader)
                .ok()
                .map(|f| f.user_id)
        } else {
            None
        };

        Ok(Self {
            path,
            user_id: RefCell::new(user_id),
        })
    }

    /// Anonymous sign-in: reuse the stored uid or mint and persist a new one
    pub fn sign_in_anonymously(&self) -> Result<String, AuthError> {
        if let Some(existing) = self.user_id.borrow().clone() {
            return Ok(existing);
        }
        let user_id = Uuid::new_v4().to_string();
        self.persist(&user_id)?;
        debug!(user_id = %user_id, "signed in anonymously");
        *self.user_id.borrow_mut() = Some(user_id.clone());
        Ok(user_id)
    }

    /// Token-based sign-in: the token carries the uid and replaces any
    /// stored anonymous identity
    pub fn sign_in_with_token(&self, token: &str) -> Result<String, AuthError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthError::SignInFailed("empty auth token".to_string()));
        }
        self.persist(token)?;
        debug!(user_id = token, "signed in with token");
        *self.user_id.borrow_mut() = Some(token.to_string());
        Ok(token.to_string())
    }

    fn persist(&self, user_id: &str) -> Result<(), AuthError> {
        let file = File::create(&self.path).map_err(|e| AuthError::SignInFailed(e.to_string()))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(
            writer,
            &IdentityFile {
                user_id: user_id.to_string(),
            },
        )
        .map_err(|e| AuthError::SignInFailed(e.to_string()))
    }
}

impl IdentityProvider for StoredIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.user_id.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_identity_before_sign_in() {
        let dir = tempfile::tempdir().unwrap();
        let identity = StoredIdentity::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(identity.current_user_id(), None);
    }

    #[test]
    fn test_anonymous_uid_is_stable_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let first = {
            let identity = StoredIdentity::open(dir.path().to_path_buf()).unwrap();
            identity.sign_in_anonymously().unwrap()
        };

        let identity = StoredIdentity::open(dir.path().to_path_buf()).unwrap();
        assert_eq!(identity.current_user_id(), Some(first.clone()));
        assert_eq!(identity.sign_in_anonymously().unwrap(), first);
    }

    #[test]
    fn test_token_sign_in_sets_uid_from_token() {
        let dir = tempfile::tempdir().unwrap();
        let identity = StoredIdentity::open(dir.path().to_path_buf()).unwrap();
        let uid = identity.sign_in_with_token("staff-uid-7").unwrap();
        assert_eq!(uid, "staff-uid-7");
        assert_eq!(identity.current_user_id(), Some("staff-uid-7".to_string()));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let identity = StoredIdentity::open(dir.path().to_path_buf()).unwrap();
        assert!(identity.sign_in_with_token("  ").is_err());
        assert_eq!(identity.current_user_id(), None);
    }
}
