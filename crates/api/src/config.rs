//! Server configuration from the environment.

use std::net::SocketAddr;

const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    /// Seed the demo employees at startup.
    pub seed_demo: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            seed_demo: true,
        }
    }
}

impl ApiConfig {
    /// Read `PHARMACRM_BIND` and `PHARMACRM_SEED_DEMO`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let bind = match lookup("PHARMACRM_BIND") {
            None => default_bind(),
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid PHARMACRM_BIND; using {DEFAULT_BIND}");
                default_bind()
            }),
        };

        let seed_demo = match lookup("PHARMACRM_SEED_DEMO").as_deref() {
            None => true,
            Some("1" | "true" | "yes") => true,
            Some("0" | "false" | "no") => false,
            Some(other) => {
                tracing::warn!(value = other, "invalid PHARMACRM_SEED_DEMO; seeding demo data");
                true
            }
        };

        Self { bind, seed_demo }
    }
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}
