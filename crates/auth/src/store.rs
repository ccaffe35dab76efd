//! Persisted copy of the signed-in employee.
//!
//! The store itself is an untyped string slot; [`load_employee`] and
//! [`save_employee`] add the JSON encoding on top.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use pharmacrm_core::Employee;

/// Fixed key the session record is stored under.
pub const SESSION_STORAGE_KEY: &str = "pavittar_pharma_employee";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to encode session record: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("stored session record is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),
}

/// Key-value slot holding the serialized session record.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Result<Option<String>, StoreError>;
    fn set(&self, value: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Read and decode the stored employee.
///
/// An absent record is `Ok(None)`; an unparsable one is `StoreError::Corrupt`.
pub fn load_employee(store: &dyn SessionStore) -> Result<Option<Employee>, StoreError> {
    match store.get()? {
        None => Ok(None),
        Some(raw) => serde_json::from_str(&raw).map(Some).map_err(StoreError::Corrupt),
    }
}

pub fn save_employee(store: &dyn SessionStore, employee: &Employee) -> Result<(), StoreError> {
    let raw = serde_json::to_string(employee).map_err(StoreError::Encode)?;
    store.set(&raw)
}

/// Process-local store. Sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn set(&self, value: &str) -> Result<(), StoreError> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).take();
        Ok(())
    }
}

/// File-backed store: `<dir>/pavittar_pharma_employee.json`.
///
/// Survives restarts of the process, scoped to one user profile directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SESSION_STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, value: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash never leaves a half-written record.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
