use axum::{
    Router,
    routing::{get, post},
};

pub mod employee_auth;
pub mod system;

/// Router for the function and operator endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/functions/v1/employee-auth", post(employee_auth::handle))
        .route("/audit", get(system::audit))
}
