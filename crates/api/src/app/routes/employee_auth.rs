use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use pharmacrm_auth::VerifierRequest;
use pharmacrm_directory::EmployeeAuthService;

use crate::app::errors::verifier_error;

/// `POST /functions/v1/employee-auth`
///
/// Well-formed requests always answer 200; success or failure is carried in
/// the body's `status` field. Unparsable bodies and unknown actions get 400.
pub async fn handle(
    Extension(service): Extension<Arc<EmployeeAuthService>>,
    body: Bytes,
) -> Response {
    let request: VerifierRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "rejecting malformed employee-auth request");
            return verifier_error(StatusCode::BAD_REQUEST, format!("Invalid request: {e}"));
        }
    };

    // Password hashing is CPU-bound; keep it off the async workers.
    match tokio::task::spawn_blocking(move || service.handle(request)).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "employee-auth handler task failed");
            verifier_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
        }
    }
}
