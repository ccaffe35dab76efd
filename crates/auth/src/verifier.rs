//! Contract with the remote credential verifier (the `employee-auth` function).

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use pharmacrm_core::{Employee, EmployeeId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The verifier could not be reached.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("verifier did not answer within {0:?}")]
    Timeout(Duration),

    /// The verifier answered with a non-success HTTP status.
    #[error("verifier failed with HTTP {status}: {message}")]
    Server { status: u16, message: String },

    /// The verifier answered and refused the credentials.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The verifier answered with something that is not a valid response.
    #[error("malformed verifier response: {0}")]
    Protocol(String),
}

/// Remote collaborator that checks credentials and records audit entries.
///
/// Implementations must append exactly one audit record per successful
/// login or logout call.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify `identifier` (username or employee id) and `password`.
    async fn login(&self, identifier: &str, password: &str) -> Result<Employee, VerifyError>;

    /// Tell the verifier that `employee_id` signed out.
    async fn logout(&self, employee_id: &EmployeeId) -> Result<(), VerifyError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire format
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum VerifierRequest {
    Login {
        #[serde(alias = "username")]
        identifier: String,
        password: String,
    },
    /// A logout without an id is acknowledged but leaves no audit trace.
    Logout {
        #[serde(rename = "employeeId", default, skip_serializing_if = "Option::is_none")]
        employee_id: Option<EmployeeId>,
    },
}

impl VerifierRequest {
    pub fn login(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Login {
            identifier: identifier.into(),
            password: password.into(),
        }
    }

    pub fn logout(employee_id: EmployeeId) -> Self {
        Self::Logout {
            employee_id: Some(employee_id),
        }
    }

    pub fn action(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Logout { .. } => "logout",
        }
    }
}

// Passwords stay out of logs.
impl core::fmt::Debug for VerifierRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Login { identifier, .. } => f
                .debug_struct("Login")
                .field("identifier", identifier)
                .field("password", &"<redacted>")
                .finish(),
            Self::Logout { employee_id } => f
                .debug_struct("Logout")
                .field("employee_id", employee_id)
                .finish(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierResponse {
    pub status: ResponseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee: Option<Employee>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VerifierResponse {
    pub fn logged_in(employee: Employee) -> Self {
        Self {
            status: ResponseStatus::Success,
            employee: Some(employee),
            error: None,
            message: None,
        }
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            employee: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            employee: None,
            error: Some(error.into()),
            message: None,
        }
    }

    /// Interpret a login answer.
    pub fn into_employee(self) -> Result<Employee, VerifyError> {
        match self.status {
            ResponseStatus::Success => self
                .employee
                .ok_or_else(|| VerifyError::Protocol("success without employee".to_string())),
            ResponseStatus::Error => Err(self.into_rejection()),
        }
    }

    /// Interpret a logout (or any acknowledgement-only) answer.
    pub fn into_ack(self) -> Result<(), VerifyError> {
        match self.status {
            ResponseStatus::Success => Ok(()),
            ResponseStatus::Error => Err(self.into_rejection()),
        }
    }

    fn into_rejection(self) -> VerifyError {
        VerifyError::Rejected(
            self.error
                .unwrap_or_else(|| "Authentication failed".to_string()),
        )
    }
}
