//! The sanitized employee record the session layer works with.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::EmployeeId;

/// Role carried by an employee; governs feature access.
///
/// Only `admin`, `sales_rep` and `manager` are issued by the directory. Any
/// other wire value decodes to [`Role::Unrecognized`], which grants nothing.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    SalesRep,
    Manager,
    Unrecognized,
}

impl Role {
    /// Roles the directory can issue.
    pub const ALL: [Role; 3] = [Role::Admin, Role::SalesRep, Role::Manager];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::SalesRep => "sales_rep",
            Role::Manager => "manager",
            Role::Unrecognized => "unrecognized",
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Unrecognized)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse: unknown names are an error. Use this for operator input
/// (seeding, config); wire decoding goes through `From<String>` instead.
impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "sales_rep" => Ok(Role::SalesRep),
            "manager" => Ok(Role::Manager),
            other => Err(DomainError::UnknownRole(other.to_string())),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Role::Unrecognized)
    }
}

impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// An authenticated employee as seen by the client.
///
/// Never carries a password or hash. Immutable once received; a new login
/// replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl Employee {
    pub fn new(id: EmployeeId, name: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: None,
            role,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
