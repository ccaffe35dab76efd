use axum::http::StatusCode;
use axum::response::IntoResponse;

use pharmacrm_auth::VerifierResponse;

/// Error body in the verifier's own response shape, so clients only ever
/// parse one format.
pub fn verifier_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, axum::Json(VerifierResponse::error(message))).into_response()
}
