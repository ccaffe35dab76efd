//! The `employee-auth` action handler.

use std::sync::Arc;

use chrono::Utc;

use pharmacrm_auth::{VerifierRequest, VerifierResponse};
use pharmacrm_core::EmployeeId;

use crate::audit::{AuditAction, AuditEntry, AuditLog};
use crate::directory::EmployeeDirectory;

/// Answer for both unknown identifiers and wrong passwords.
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Verifies credentials against the directory and records audit entries.
///
/// - Unknown identifier and wrong password answer identically
/// - Exactly one audit entry per successful login or logout
/// - An audit write failure is logged and does not fail the call
pub struct EmployeeAuthService {
    directory: Arc<EmployeeDirectory>,
    audit: Arc<dyn AuditLog>,
}

impl EmployeeAuthService {
    pub fn new(directory: Arc<EmployeeDirectory>, audit: Arc<dyn AuditLog>) -> Self {
        Self { directory, audit }
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    pub fn audit(&self) -> &dyn AuditLog {
        self.audit.as_ref()
    }

    pub fn handle(&self, request: VerifierRequest) -> VerifierResponse {
        tracing::debug!(action = request.action(), "employee-auth request");
        match request {
            VerifierRequest::Login {
                identifier,
                password,
            } => self.login(&identifier, &password),
            VerifierRequest::Logout { employee_id } => self.logout(employee_id),
        }
    }

    fn login(&self, identifier: &str, password: &str) -> VerifierResponse {
        let Some(record) = self.directory.find_by_identifier(identifier) else {
            tracing::info!(identifier, "login rejected: unknown identifier");
            return VerifierResponse::error(INVALID_CREDENTIALS);
        };

        if !record.verify_password(password) {
            tracing::info!(employee_id = %record.id, "login rejected: password mismatch");
            return VerifierResponse::error(INVALID_CREDENTIALS);
        }

        let now = Utc::now();
        self.directory.touch_login(&record.id, now);
        self.append_audit(AuditEntry::new(record.id.clone(), AuditAction::LoggedIn, now));

        tracing::info!(employee_id = %record.id, "login accepted");
        VerifierResponse::logged_in(record.sanitize())
    }

    fn logout(&self, employee_id: Option<EmployeeId>) -> VerifierResponse {
        match employee_id {
            Some(id) => self.append_audit(AuditEntry::new(id, AuditAction::LoggedOut, Utc::now())),
            None => tracing::debug!("logout without employee id; nothing to audit"),
        }
        VerifierResponse::ok("Logged out successfully")
    }

    fn append_audit(&self, entry: AuditEntry) {
        let employee_id = entry.employee_id.clone();
        if let Err(e) = self.audit.record(entry) {
            tracing::error!(employee_id = %employee_id, error = %e, "failed to write audit entry");
        }
    }
}
