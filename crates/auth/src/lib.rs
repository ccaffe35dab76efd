//! `pharmacrm-auth` — client-side employee session layer.
//!
//! Credential verification is delegated to a remote collaborator
//! ([`CredentialVerifier`]); this crate owns the session cache, its persisted
//! copy, auth-change fan-out and the role policy the UI consults.

pub mod authorize;
pub mod broadcast;
pub mod config;
pub mod http;
pub mod session;
pub mod store;
pub mod verifier;

pub use authorize::{
    AccessExplanation, AuthzError, DenialKind, accessible_features, authorize, can_access,
    can_access_named, explain_access, has_role, is_admin, role_grants, shows_admin_navigation,
};
pub use broadcast::{AuthBroadcaster, AuthSubscription};
pub use config::AuthConfig;
pub use http::HttpCredentialVerifier;
pub use session::{AuthSession, LoginError, LogoutReport, SessionSetupError};
pub use store::{
    FileSessionStore, MemorySessionStore, SESSION_STORAGE_KEY, SessionStore, StoreError,
    load_employee, save_employee,
};
pub use verifier::{CredentialVerifier, ResponseStatus, VerifierRequest, VerifierResponse, VerifyError};

pub use pharmacrm_core::{Employee, EmployeeId, Feature, Role};
