//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/functions/v1/employee-auth";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Where the verifier lives and where sessions are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Full URL of the employee-auth function.
    pub endpoint: String,
    /// Anonymous API key sent as `apikey` and bearer token, if the gateway needs one.
    pub api_key: Option<String>,
    /// Upper bound for one verifier round trip.
    pub timeout: Duration,
    pub session_dir: PathBuf,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            session_dir: default_session_dir(),
        }
    }
}

impl AuthConfig {
    /// Read `PHARMACRM_AUTH_URL`, `PHARMACRM_API_KEY`,
    /// `PHARMACRM_AUTH_TIMEOUT_SECS` and `PHARMACRM_SESSION_DIR`.
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let timeout = match lookup("PHARMACRM_AUTH_TIMEOUT_SECS") {
            None => defaults.timeout,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "invalid PHARMACRM_AUTH_TIMEOUT_SECS; using default");
                    defaults.timeout
                }
            },
        };

        Self {
            endpoint: lookup("PHARMACRM_AUTH_URL")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(defaults.endpoint),
            api_key: lookup("PHARMACRM_API_KEY").filter(|s| !s.is_empty()),
            timeout,
            session_dir: lookup("PHARMACRM_SESSION_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_dir),
        }
    }
}

fn default_session_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("pharmacrm")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let cfg = AuthConfig::from_lookup(lookup(&[]));
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.api_key, None);
        assert!(cfg.session_dir.ends_with("pharmacrm"));
    }

    #[test]
    fn env_values_override_defaults() {
        let cfg = AuthConfig::from_lookup(lookup(&[
            ("PHARMACRM_AUTH_URL", "https://crm.example/functions/v1/employee-auth"),
            ("PHARMACRM_API_KEY", "anon"),
            ("PHARMACRM_AUTH_TIMEOUT_SECS", "3"),
            ("PHARMACRM_SESSION_DIR", "/tmp/sessions"),
        ]));
        assert_eq!(cfg.endpoint, "https://crm.example/functions/v1/employee-auth");
        assert_eq!(cfg.api_key.as_deref(), Some("anon"));
        assert_eq!(cfg.timeout, Duration::from_secs(3));
        assert_eq!(cfg.session_dir, PathBuf::from("/tmp/sessions"));
    }

    #[test]
    fn from_env_reads_the_process_environment() {
        let cfg = AuthConfig::from_env();
        assert_eq!(cfg, AuthConfig::from_lookup(|key| std::env::var(key).ok()));
        assert!(!cfg.endpoint.is_empty());
        assert!(cfg.timeout > Duration::ZERO);
    }

    #[test]
    fn bad_timeout_falls_back() {
        let cfg = AuthConfig::from_lookup(lookup(&[("PHARMACRM_AUTH_TIMEOUT_SECS", "0")]));
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        let cfg = AuthConfig::from_lookup(lookup(&[("PHARMACRM_AUTH_TIMEOUT_SECS", "soon")]));
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
    }
}
