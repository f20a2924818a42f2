//! Mock authentication: a single identity slot mirrored to local storage.
//!
//! No credential is ever checked against anything. Login only enforces a
//! non-empty email and a minimum password length, then synthesizes a fixed
//! physician identity. A stored identity is trusted on read at startup.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::models::{Identity, Role};

/// Storage key holding the serialized identity.
pub const STORAGE_KEY: &str = "hepato_user";
pub const MIN_PASSWORD_LEN: usize = 6;

const MOCK_USER_ID: &str = "1";
const MOCK_USER_NAME: &str = "Alexander Fleming";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Please enter valid credentials.")]
    EmptyCredentials,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Could not persist identity: {0}")]
    Storage(#[from] StorageError),
    #[error("Could not serialize identity: {0}")]
    Serialization(#[from] serde_json::Error),
}

// ═══════════════════════════════════════════
// Key/value storage
// ═══════════════════════════════════════════

/// String key/value persistence, the server-side stand-in for browser
/// local storage.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key under a directory.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        // Readers only ever see a complete value
        let staging = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, self.path_for(key))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory storage for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut values = self.values.lock().map_err(|_| StorageError::LockPoisoned)?;
        values.remove(key);
        Ok(())
    }
}

// ═══════════════════════════════════════════
// Auth store
// ═══════════════════════════════════════════

/// Reject credentials before any identity is created.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), LoginError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(LoginError::EmptyCredentials);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LoginError::PasswordTooShort);
    }
    Ok(())
}

/// The fixed demo identity, carrying the submitted email.
pub fn mock_identity(email: &str) -> Identity {
    Identity {
        id: MOCK_USER_ID.to_string(),
        name: MOCK_USER_NAME.to_string(),
        role: Role::Physician,
        email: email.trim().to_string(),
    }
}

/// Holds at most one identity.
pub struct AuthStore {
    identity: Option<Identity>,
    storage: Arc<dyn KeyValueStorage>,
}

impl AuthStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            identity: None,
            storage,
        }
    }

    /// Load a previously stored identity without re-validation.
    ///
    /// Unreadable or corrupt values are logged and treated as absent.
    pub fn restore(&mut self) -> Option<&Identity> {
        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "Could not read stored identity");
                None
            }
        };

        self.identity = raw.and_then(|raw| match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring corrupt stored identity");
                None
            }
        });

        if let Some(identity) = &self.identity {
            tracing::info!(email = %identity.email, "Restored stored identity");
        }
        self.identity.as_ref()
    }

    pub fn current(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Create the identity and persist it. Replaces any existing identity.
    pub fn login(&mut self, email: &str, password: &str) -> Result<Identity, LoginError> {
        validate_credentials(email, password)?;

        let identity = mock_identity(email);
        let serialized = serde_json::to_string(&identity)?;
        self.storage.set(STORAGE_KEY, &serialized)?;
        self.identity = Some(identity.clone());

        tracing::info!(email = %identity.email, "Physician logged in");
        Ok(identity)
    }

    /// Clear the slot and persistent storage. The slot is cleared even when
    /// storage removal fails.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        if let Some(identity) = self.identity.take() {
            tracing::info!(email = %identity.email, "Physician logged out");
        }
        self.storage.remove(STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> (AuthStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::default());
        (AuthStore::new(storage.clone()), storage)
    }

    #[test]
    fn short_password_is_rejected() {
        let (mut store, storage) = memory_store();
        let err = store.login("x@y.com", "short").unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
        assert!(!store.is_authenticated());
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());
    }

    #[test]
    fn empty_credentials_are_rejected() {
        let (mut store, _) = memory_store();
        let err = store.login("", "longenough").unwrap_err();
        assert_eq!(err.to_string(), "Please enter valid credentials.");
        let err = store.login("x@y.com", "").unwrap_err();
        assert!(matches!(err, LoginError::EmptyCredentials));
    }

    #[test]
    fn six_character_password_logs_in_with_fixed_identity() {
        let (mut store, storage) = memory_store();
        let identity = store.login("x@y.com", "sixsix").unwrap();
        assert_eq!(identity.id, "1");
        assert_eq!(identity.name, "Alexander Fleming");
        assert_eq!(identity.role, Role::Physician);
        assert_eq!(identity.email, "x@y.com");
        assert_eq!(store.current(), Some(&identity));

        let stored = storage.get(STORAGE_KEY).unwrap().unwrap();
        let parsed: Identity = serde_json::from_str(&stored).unwrap();
        assert_eq!(parsed, identity);
    }

    #[test]
    fn email_is_trimmed_and_blank_email_rejected() {
        let (mut store, _) = memory_store();
        assert!(matches!(
            store.login("   ", "password").unwrap_err(),
            LoginError::EmptyCredentials
        ));
        store.login("  doc@hospital.com ", "password").unwrap();
        assert_eq!(store.current().unwrap().email, "doc@hospital.com");
    }

    #[test]
    fn second_login_replaces_identity() {
        let (mut store, _) = memory_store();
        store.login("a@y.com", "password").unwrap();
        store.login("b@y.com", "password").unwrap();
        assert_eq!(store.current().unwrap().email, "b@y.com");
    }

    #[test]
    fn logout_clears_slot_and_storage() {
        let (mut store, storage) = memory_store();
        store.login("x@y.com", "password").unwrap();
        store.logout().unwrap();
        assert!(!store.is_authenticated());
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());

        // A fresh store on the same storage finds nothing
        let mut restarted = AuthStore::new(storage);
        assert!(restarted.restore().is_none());
    }

    #[test]
    fn restore_trusts_stored_identity() {
        let storage = Arc::new(MemoryStorage::default());
        storage
            .set(
                STORAGE_KEY,
                r#"{"id":"7","name":"Someone Else","role":"admin","email":"e@h.org"}"#,
            )
            .unwrap();
        let mut store = AuthStore::new(storage);
        let restored = store.restore().unwrap();
        assert_eq!(restored.id, "7");
        assert_eq!(restored.role, Role::Admin);
        assert!(store.is_authenticated());
    }

    #[test]
    fn restore_ignores_corrupt_value() {
        let storage = Arc::new(MemoryStorage::default());
        storage.set(STORAGE_KEY, "{not an identity").unwrap();
        let mut store = AuthStore::new(storage);
        assert!(store.restore().is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn file_storage_round_trips_and_removes() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(tmp.path().join("nested"));
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());

        storage.set(STORAGE_KEY, "value").unwrap();
        assert!(tmp.path().join("nested/hepato_user.json").exists());
        assert_eq!(storage.get(STORAGE_KEY).unwrap().as_deref(), Some("value"));

        storage.remove(STORAGE_KEY).unwrap();
        assert!(storage.get(STORAGE_KEY).unwrap().is_none());
        // Removing twice is fine
        storage.remove(STORAGE_KEY).unwrap();
    }

    #[test]
    fn identity_survives_restart_on_file_storage() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = AuthStore::new(Arc::new(FileStorage::new(tmp.path())));
        store.login("doc@hospital.com", "hunter22").unwrap();

        let mut restarted = AuthStore::new(Arc::new(FileStorage::new(tmp.path())));
        assert_eq!(restarted.restore().unwrap().email, "doc@hospital.com");
    }
}
