//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Keep this focused on deterministic failures (parsing, identifiers).
/// Transport and storage concerns belong to the crates that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. empty).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A feature name did not match any known capability area.
    #[error("unknown feature: {0}")]
    UnknownFeature(String),

    /// A role name did not match any known role.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
