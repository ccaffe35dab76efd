//! Audit trail of sign-ins and sign-outs.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use pharmacrm_core::EmployeeId;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    LoggedIn,
    LoggedOut,
}

impl AuditAction {
    /// Label stored alongside the entry.
    pub fn label(&self) -> &'static str {
        match self {
            AuditAction::LoggedIn => "User logged in",
            AuditAction::LoggedOut => "User logged out",
        }
    }
}

/// One audit record, attributed to the acting employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub entry_id: Uuid,
    pub employee_id: EmployeeId,
    pub action: AuditAction,
    pub label: String,
    pub recorded_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(employee_id: EmployeeId, action: AuditAction, recorded_at: DateTime<Utc>) -> Self {
        Self {
            entry_id: Uuid::now_v7(),
            employee_id,
            action,
            label: action.label().to_string(),
            recorded_at,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Append-only audit sink.
pub trait AuditLog: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;

    /// All entries, oldest first.
    fn entries(&self) -> Vec<AuditEntry>;
}

#[derive(Debug, Default)]
pub struct InMemoryAuditLog {
    entries: Mutex<Vec<AuditEntry>>,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditLog for InMemoryAuditLog {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
        Ok(())
    }

    fn entries(&self) -> Vec<AuditEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
