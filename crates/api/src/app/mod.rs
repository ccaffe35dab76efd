//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `routes/`: HTTP routes + handlers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{
        HeaderName, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};

use pharmacrm_directory::{EmployeeAuthService, EmployeeDirectory, InMemoryAuditLog, seed};

use crate::config::ApiConfig;

pub mod errors;
pub mod routes;

/// Build the full HTTP router around an existing service.
pub fn build_app(service: Arc<EmployeeAuthService>) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(Extension(service))
        .layer(cors())
}

/// Browser clients call the function directly, from any origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ])
}

/// Build the auth service described by `config` (in-memory directory and
/// audit log, optionally seeded with the demo employees).
pub fn build_service(config: &ApiConfig) -> anyhow::Result<Arc<EmployeeAuthService>> {
    let directory = EmployeeDirectory::new();
    if config.seed_demo {
        seed::seed_demo(&directory)?;
    } else {
        tracing::warn!("demo seeding disabled; directory starts empty");
    }

    Ok(Arc::new(EmployeeAuthService::new(
        Arc::new(directory),
        Arc::new(InMemoryAuditLog::new()),
    )))
}
