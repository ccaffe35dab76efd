//! Stored employee record (server side only).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};

use pharmacrm_core::{Employee, EmployeeId, Role};

use crate::directory::DirectoryError;

/// An employee as the directory stores it, password hash included.
///
/// Never leaves the directory; callers get [`EmployeeRecord::sanitize`].
#[derive(Clone)]
pub struct EmployeeRecord {
    pub id: EmployeeId,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    password_hash: String,
    pub last_login: Option<DateTime<Utc>>,
}

impl EmployeeRecord {
    /// Build a record, hashing `password` with Argon2id.
    pub fn new(
        id: EmployeeId,
        username: impl Into<String>,
        name: impl Into<String>,
        role: Role,
        password: &str,
    ) -> Result<Self, DirectoryError> {
        Ok(Self {
            id,
            username: username.into(),
            name: name.into(),
            email: None,
            role,
            password_hash: hash_password(password)?,
            last_login: None,
        })
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::error!(employee_id = %self.id, error = %e, "stored password hash is malformed");
                false
            }
        }
    }

    /// The client-safe view of this record.
    pub fn sanitize(&self) -> Employee {
        Employee {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

impl core::fmt::Debug for EmployeeRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmployeeRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("role", &self.role)
            .field("last_login", &self.last_login)
            .finish_non_exhaustive()
    }
}

fn hash_password(password: &str) -> Result<String, DirectoryError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| DirectoryError::Hashing(e.to_string()))
}
