//! In-memory employee directory.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use pharmacrm_core::{DomainError, EmployeeId};

use crate::record::EmployeeRecord;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("employee id already exists: {0}")]
    DuplicateId(EmployeeId),

    #[error("username already taken: {0}")]
    DuplicateUsername(String),

    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Employee records keyed by id, with a unique username index.
#[derive(Debug, Default)]
pub struct EmployeeDirectory {
    records: RwLock<HashMap<EmployeeId, EmployeeRecord>>,
}

impl EmployeeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: EmployeeRecord) -> Result<(), DirectoryError> {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        if records.contains_key(&record.id) {
            return Err(DirectoryError::DuplicateId(record.id));
        }
        if records.values().any(|r| r.username == record.username) {
            return Err(DirectoryError::DuplicateUsername(record.username));
        }
        records.insert(record.id.clone(), record);
        Ok(())
    }

    /// Resolve a login identifier: username first, then employee id.
    pub fn find_by_identifier(&self, identifier: &str) -> Option<EmployeeRecord> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        records
            .values()
            .find(|r| r.username == identifier)
            .or_else(|| records.values().find(|r| r.id.as_str() == identifier))
            .cloned()
    }

    pub fn get(&self, id: &EmployeeId) -> Option<EmployeeRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Stamp a successful login.
    pub fn touch_login(&self, id: &EmployeeId, at: DateTime<Utc>) {
        if let Some(record) = self
            .records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(id)
        {
            record.last_login = Some(at);
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
