//! `pharmacrm-directory` — the credential verifier's side of the contract.
//!
//! Holds employee records with hashed passwords, answers `login`/`logout`
//! actions and keeps the audit trail of sign-ins and sign-outs.

pub mod audit;
pub mod directory;
pub mod local;
pub mod record;
pub mod seed;
pub mod service;

pub use audit::{AuditAction, AuditEntry, AuditError, AuditLog, InMemoryAuditLog};
pub use directory::{DirectoryError, EmployeeDirectory};
pub use local::LocalCredentialVerifier;
pub use record::EmployeeRecord;
pub use service::{EmployeeAuthService, INVALID_CREDENTIALS};
