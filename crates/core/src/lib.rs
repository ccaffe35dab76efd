//! `pharmacrm-core` — domain primitives shared by the session layer and the
//! directory service.
//!
//! This crate contains **pure domain** types (no IO, no async).

pub mod employee;
pub mod error;
pub mod feature;
pub mod id;

pub use employee::{Employee, Role};
pub use error::DomainError;
pub use feature::Feature;
pub use id::EmployeeId;
