use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode};

use pharmacrm_directory::{AuditEntry, AuditLog, EmployeeAuthService};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Audit trail, oldest first.
pub async fn audit(Extension(service): Extension<Arc<EmployeeAuthService>>) -> Json<Vec<AuditEntry>> {
    Json(service.audit().entries())
}
