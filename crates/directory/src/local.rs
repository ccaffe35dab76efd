//! In-process credential verifier.
//!
//! Runs the same request/response exchange as the HTTP path without a
//! network hop. Used for offline mode and tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use pharmacrm_auth::{CredentialVerifier, VerifierRequest, VerifierResponse, VerifyError};
use pharmacrm_core::{Employee, EmployeeId};

use crate::service::EmployeeAuthService;

pub struct LocalCredentialVerifier {
    service: Arc<EmployeeAuthService>,
    reachable: AtomicBool,
}

impl LocalCredentialVerifier {
    pub fn new(service: Arc<EmployeeAuthService>) -> Self {
        Self {
            service,
            reachable: AtomicBool::new(true),
        }
    }

    /// Simulate the verifier going away (`false`) or coming back (`true`).
    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    fn exchange(&self, request: VerifierRequest) -> Result<VerifierResponse, VerifyError> {
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(VerifyError::Transport("verifier unreachable".to_string()));
        }
        Ok(self.service.handle(request))
    }
}

#[async_trait]
impl CredentialVerifier for LocalCredentialVerifier {
    async fn login(&self, identifier: &str, password: &str) -> Result<Employee, VerifyError> {
        self.exchange(VerifierRequest::login(identifier, password))?
            .into_employee()
    }

    async fn logout(&self, employee_id: &EmployeeId) -> Result<(), VerifyError> {
        self.exchange(VerifierRequest::logout(employee_id.clone()))?
            .into_ack()
    }
}
