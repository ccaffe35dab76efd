//! HTTP client for the employee-auth function.

use std::time::Duration;

use async_trait::async_trait;

use pharmacrm_core::{Employee, EmployeeId};

use crate::config::AuthConfig;
use crate::verifier::{CredentialVerifier, VerifierRequest, VerifierResponse, VerifyError};

/// Calls the verifier over HTTP: one JSON POST per action, no retries.
#[derive(Debug, Clone)]
pub struct HttpCredentialVerifier {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl HttpCredentialVerifier {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerifyError::Transport(format!("failed to build http client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key,
            timeout,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, VerifyError> {
        Self::new(config.endpoint.clone(), config.api_key.clone(), config.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, request: &VerifierRequest) -> Result<VerifierResponse, VerifyError> {
        let mut builder = self.client.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            builder = builder.header("apikey", key).bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        // Only a 2xx answer can carry a verdict on the credentials; any other
        // status is a service failure, whatever its body says.
        if !status.is_success() {
            let message = serde_json::from_str::<VerifierResponse>(&body)
                .ok()
                .and_then(|r| r.error.or(r.message))
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string());
            return Err(VerifyError::Server {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<VerifierResponse>(&body).map_err(|e| VerifyError::Protocol(e.to_string()))
    }

    fn transport_error(&self, err: reqwest::Error) -> VerifyError {
        if err.is_timeout() {
            VerifyError::Timeout(self.timeout)
        } else {
            VerifyError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl CredentialVerifier for HttpCredentialVerifier {
    async fn login(&self, identifier: &str, password: &str) -> Result<Employee, VerifyError> {
        self.call(&VerifierRequest::login(identifier, password))
            .await?
            .into_employee()
    }

    async fn logout(&self, employee_id: &EmployeeId) -> Result<(), VerifyError> {
        self.call(&VerifierRequest::logout(employee_id.clone()))
            .await?
            .into_ack()
    }
}
