//! The employee session context.
//!
//! One [`AuthSession`] per application; clone it into whatever needs it.
//! It ties together the credential verifier, the persisted session record,
//! the in-memory current-user cache and the auth-change broadcaster.
//!
//! # Invariants
//! - At most one signed-in employee at a time; a new login replaces the old one.
//! - After any successful operation the cache and the persisted record agree.
//! - A corrupt persisted record reads as "nobody signed in" and is removed.
//! - Failed logins leave the previous session untouched.
//! - Logout always clears local state, whatever the verifier does.

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;

use pharmacrm_core::{Employee, Feature, Role};

use crate::authorize;
use crate::broadcast::{AuthBroadcaster, AuthSubscription};
use crate::config::AuthConfig;
use crate::http::HttpCredentialVerifier;
use crate::store::{self, FileSessionStore, SessionStore, StoreError};
use crate::verifier::{CredentialVerifier, VerifyError};

const UNAVAILABLE_MESSAGE: &str = "Unable to reach the sign-in service. Please try again.";

/// Why a login attempt did not produce a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoginError {
    /// Blank identifier or password; nothing was sent.
    #[error("identifier and password are required")]
    MissingCredentials,

    /// The verifier answered and refused the credentials.
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The verifier could not be reached or answered nonsense.
    #[error("credential verifier unavailable: {0}")]
    Unavailable(VerifyError),
}

impl LoginError {
    /// Stable code for logs and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            LoginError::MissingCredentials => "missing_credentials",
            LoginError::Rejected(_) => "rejected",
            LoginError::Unavailable(_) => "unavailable",
        }
    }

    /// Text safe to show on the login form.
    pub fn user_message(&self) -> String {
        match self {
            LoginError::MissingCredentials => "Please enter your username and password.".to_string(),
            LoginError::Rejected(reason) => reason.clone(),
            LoginError::Unavailable(_) => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

impl From<VerifyError> for LoginError {
    fn from(value: VerifyError) -> Self {
        match value {
            VerifyError::Rejected(reason) => LoginError::Rejected(reason),
            other => LoginError::Unavailable(other),
        }
    }
}

/// Result of a logout. Logout itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogoutReport {
    /// Who was signed in, if anyone.
    pub employee: Option<Employee>,
    /// Set when the verifier could not be told about the logout.
    pub warning: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionSetupError {
    #[error(transparent)]
    Verifier(#[from] VerifyError),
}

struct Inner {
    verifier: Arc<dyn CredentialVerifier>,
    store: Arc<dyn SessionStore>,
    current: RwLock<Option<Employee>>,
    broadcaster: AuthBroadcaster,
}

/// Auth session context (see module docs).
#[derive(Clone)]
pub struct AuthSession {
    inner: Arc<Inner>,
}

impl core::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthSession")
            .field("current", &*self.read_cache())
            .field("broadcaster", &self.inner.broadcaster)
            .finish_non_exhaustive()
    }
}

impl AuthSession {
    pub fn new(verifier: Arc<dyn CredentialVerifier>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            inner: Arc::new(Inner {
                verifier,
                store,
                current: RwLock::new(None),
                broadcaster: AuthBroadcaster::new(),
            }),
        }
    }

    /// HTTP verifier plus file-backed session record, both from `config`.
    pub fn from_config(config: &AuthConfig) -> Result<Self, SessionSetupError> {
        let verifier = HttpCredentialVerifier::from_config(config)?;
        let store = FileSessionStore::new(&config.session_dir);
        Ok(Self::new(Arc::new(verifier), Arc::new(store)))
    }

    /// Verify credentials and, on success, make `employee` the current user.
    ///
    /// Concurrent calls each do their own round trip; the last one to
    /// complete wins.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<Employee, LoginError> {
        if identifier.trim().is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        tracing::info!(identifier, "login attempt");

        match self.inner.verifier.login(identifier, password).await {
            Ok(employee) => {
                self.establish(&employee);
                tracing::info!(employee_id = %employee.id, role = %employee.role, "login succeeded");
                Ok(employee)
            }
            Err(err) => {
                let err = LoginError::from(err);
                tracing::warn!(identifier, code = err.code(), reason = %err, "login failed");
                Err(err)
            }
        }
    }

    /// Clear the local session and notify the verifier in the background.
    ///
    /// Local state is gone when this returns. The remote notification runs as
    /// a detached task on the current tokio runtime; its failure is logged.
    /// Without a runtime the notification is skipped and reported as a warning.
    pub fn logout(&self) -> LogoutReport {
        let employee = self.clear_local();

        let warning = employee
            .as_ref()
            .and_then(|e| self.spawn_remote_logout(e));

        LogoutReport { employee, warning }
    }

    /// Like [`logout`](Self::logout), but waits for the verifier and reports
    /// its failure as a warning.
    pub async fn logout_and_wait(&self) -> LogoutReport {
        let employee = self.clear_local();

        let warning = match &employee {
            None => None,
            Some(e) => match self.inner.verifier.logout(&e.id).await {
                Ok(()) => None,
                Err(err) => {
                    tracing::warn!(employee_id = %e.id, error = %err, "remote logout notification failed");
                    Some(format!("signed out locally; verifier not notified: {err}"))
                }
            },
        };

        LogoutReport { employee, warning }
    }

    /// Cached user, falling back to the persisted record.
    pub fn current_user(&self) -> Option<Employee> {
        if let Some(employee) = self.read_cache().clone() {
            return Some(employee);
        }

        match store::load_employee(self.inner.store.as_ref()) {
            Ok(Some(employee)) => {
                *self.write_cache() = Some(employee.clone());
                Some(employee)
            }
            Ok(None) => None,
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(error = %e, "discarding corrupt session record");
                if let Err(e) = self.inner.store.clear() {
                    tracing::warn!(error = %e, "failed to remove corrupt session record");
                }
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session record");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user().is_some()
    }

    pub fn has_role(&self, role: Role) -> bool {
        authorize::has_role(self.current_user().as_ref(), role)
    }

    pub fn is_admin(&self) -> bool {
        authorize::is_admin(self.current_user().as_ref())
    }

    pub fn can_access(&self, feature: Feature) -> bool {
        authorize::can_access(self.current_user().as_ref(), feature)
    }

    /// Register a listener; it is called right away with the current user and
    /// again on every login/logout/initialize.
    pub fn on_auth_state_change<F>(&self, listener: F) -> AuthSubscription
    where
        F: Fn(Option<&Employee>) + Send + Sync + 'static,
    {
        let current = self.current_user();
        self.inner.broadcaster.subscribe(listener, current.as_ref())
    }

    /// Broadcast the persisted user once (application startup).
    pub fn initialize(&self) {
        let current = self.current_user();
        tracing::debug!(authenticated = current.is_some(), "auth session initialized");
        self.inner.broadcaster.notify(current.as_ref());
    }

    fn establish(&self, employee: &Employee) {
        // Store and cache change under one guard so racing logins cannot
        // leave them holding different employees.
        {
            let mut cache = self.write_cache();
            if let Err(e) = store::save_employee(self.inner.store.as_ref(), employee) {
                tracing::warn!(employee_id = %employee.id, error = %e, "session will not survive a restart");
            }
            *cache = Some(employee.clone());
        }
        self.inner.broadcaster.notify(Some(employee));
    }

    fn clear_local(&self) -> Option<Employee> {
        let previous = self.current_user();

        {
            let mut cache = self.write_cache();
            if let Err(e) = self.inner.store.clear() {
                tracing::warn!(error = %e, "failed to clear session record");
            }
            cache.take();
        }
        self.inner.broadcaster.notify(None);

        if let Some(e) = &previous {
            tracing::info!(employee_id = %e.id, "logged out");
        }
        previous
    }

    fn spawn_remote_logout(&self, employee: &Employee) -> Option<String> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(employee_id = %employee.id, "no async runtime; remote logout notification skipped");
            return Some("signed out locally; verifier not notified (no async runtime)".to_string());
        };

        let verifier = Arc::clone(&self.inner.verifier);
        let employee_id = employee.id.clone();
        handle.spawn(async move {
            match verifier.logout(&employee_id).await {
                Ok(()) => tracing::debug!(employee_id = %employee_id, "remote logout recorded"),
                Err(err) => {
                    tracing::warn!(employee_id = %employee_id, error = %err, "remote logout notification failed")
                }
            }
        });
        None
    }

    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, Option<Employee>> {
        self.inner.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, Option<Employee>> {
        self.inner.current.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pharmacrm_core::EmployeeId;

    use crate::store::MemorySessionStore;

    /// Plaintext credential table standing in for the remote verifier.
    #[derive(Default)]
    struct StubVerifier {
        accounts: HashMap<String, (String, Employee)>,
        offline: AtomicBool,
        logout_fails: AtomicBool,
        logouts: Mutex<Vec<EmployeeId>>,
        login_calls: AtomicUsize,
    }

    impl StubVerifier {
        fn with_demo_accounts() -> Self {
            let mut accounts = HashMap::new();
            for (username, password, id, role) in [
                ("admin", "admin123", "admin-001", Role::Admin),
                ("sales", "sales123", "sales-001", Role::SalesRep),
                ("manager", "manager123", "manager-001", Role::Manager),
            ] {
                let employee = Employee::new(EmployeeId::new(id).unwrap(), username, role);
                accounts.insert(username.to_string(), (password.to_string(), employee));
            }
            Self {
                accounts,
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl CredentialVerifier for StubVerifier {
        async fn login(&self, identifier: &str, password: &str) -> Result<Employee, VerifyError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            if self.offline.load(Ordering::SeqCst) {
                return Err(VerifyError::Transport("connection refused".to_string()));
            }
            match self.accounts.get(identifier) {
                Some((expected, employee)) if expected == password => Ok(employee.clone()),
                _ => Err(VerifyError::Rejected("Invalid username or password".to_string())),
            }
        }

        async fn logout(&self, employee_id: &EmployeeId) -> Result<(), VerifyError> {
            if self.logout_fails.load(Ordering::SeqCst) {
                return Err(VerifyError::Transport("connection reset".to_string()));
            }
            self.logouts.lock().unwrap().push(employee_id.clone());
            Ok(())
        }
    }

    fn session() -> (AuthSession, Arc<StubVerifier>, Arc<MemorySessionStore>) {
        let verifier = Arc::new(StubVerifier::with_demo_accounts());
        let store = Arc::new(MemorySessionStore::new());
        let session = AuthSession::new(verifier.clone(), store.clone());
        (session, verifier, store)
    }

    #[tokio::test]
    async fn successful_login_sets_current_user_and_persists_it() {
        let (session, _, store) = session();

        let employee = session.login("manager", "manager123").await.unwrap();

        assert_eq!(employee.id.as_str(), "manager-001");
        assert_eq!(session.current_user(), Some(employee.clone()));
        assert_eq!(store::load_employee(store.as_ref()).unwrap(), Some(employee));
        assert!(session.is_authenticated());
        assert!(session.has_role(Role::Manager));
        assert!(session.can_access(Feature::Inventory));
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn wrong_password_keeps_previous_session() {
        let (session, _, _) = session();
        let admin = session.login("admin", "admin123").await.unwrap();

        let err = session.login("sales", "nope").await.unwrap_err();

        assert_eq!(err.code(), "rejected");
        assert_eq!(session.current_user(), Some(admin));
    }

    #[tokio::test]
    async fn transport_failure_is_distinct_from_rejection() {
        let (session, verifier, _) = session();
        verifier.offline.store(true, Ordering::SeqCst);

        let unavailable = session.login("admin", "admin123").await.unwrap_err();
        verifier.offline.store(false, Ordering::SeqCst);
        let rejected = session.login("admin", "wrong").await.unwrap_err();

        assert!(matches!(unavailable, LoginError::Unavailable(VerifyError::Transport(_))));
        assert_eq!(rejected, LoginError::Rejected("Invalid username or password".to_string()));
        assert_ne!(unavailable.code(), rejected.code());
        assert_ne!(unavailable.user_message(), rejected.user_message());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn identifier_is_sent_as_typed() {
        let (session, _, _) = session();

        // The stub matches exact usernames, so padding reaches it unchanged.
        let err = session.login(" admin ", "admin123").await.unwrap_err();

        assert_eq!(err.code(), "rejected");
    }

    #[tokio::test]
    async fn blank_credentials_never_reach_the_verifier() {
        let (session, verifier, _) = session();

        assert_eq!(session.login("   ", "x").await, Err(LoginError::MissingCredentials));
        assert_eq!(session.login("admin", "").await, Err(LoginError::MissingCredentials));
        assert_eq!(verifier.login_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn logout_clears_state_even_when_remote_fails() {
        let (session, verifier, store) = session();
        session.login("sales", "sales123").await.unwrap();
        verifier.logout_fails.store(true, Ordering::SeqCst);

        let report = session.logout();

        assert_eq!(report.employee.map(|e| e.id.to_string()).as_deref(), Some("sales-001"));
        assert_eq!(report.warning, None);
        assert!(session.current_user().is_none());
        assert!(!session.is_authenticated());
        assert_eq!(store.get().unwrap(), None);

        // Let the detached notification run; its failure only gets logged.
        tokio::task::yield_now().await;
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn detached_logout_reaches_the_verifier() {
        let (session, verifier, _) = session();
        session.login("admin", "admin123").await.unwrap();

        session.logout();
        for _ in 0..10 {
            if !verifier.logouts.lock().unwrap().is_empty() {
                break;
            }
            tokio::task::yield_now().await;
        }

        assert_eq!(
            *verifier.logouts.lock().unwrap(),
            vec![EmployeeId::new("admin-001").unwrap()]
        );
    }

    #[tokio::test]
    async fn awaited_logout_surfaces_remote_failure_as_warning() {
        let (session, verifier, _) = session();
        session.login("admin", "admin123").await.unwrap();
        verifier.logout_fails.store(true, Ordering::SeqCst);

        let report = session.logout_and_wait().await;

        assert!(report.warning.is_some());
        assert!(session.current_user().is_none());
    }

    #[tokio::test]
    async fn logout_while_signed_out_skips_the_verifier() {
        let (session, verifier, _) = session();

        let report = session.logout_and_wait().await;

        assert_eq!(report, LogoutReport::default());
        assert!(verifier.logouts.lock().unwrap().is_empty());
    }

    #[test]
    fn logout_without_runtime_still_clears_locally() {
        let (session, _, store) = session();
        let employee = Employee::new(EmployeeId::new("admin-001").unwrap(), "Admin", Role::Admin);
        store::save_employee(store.as_ref(), &employee).unwrap();

        let report = session.logout();

        assert_eq!(report.employee, Some(employee));
        assert!(report.warning.is_some());
        assert!(session.current_user().is_none());
    }

    #[test]
    fn persisted_session_is_picked_up_by_a_fresh_context() {
        let (_, verifier, store) = session();
        let employee = Employee::new(EmployeeId::new("sales-001").unwrap(), "Sales Rep", Role::SalesRep);
        store::save_employee(store.as_ref(), &employee).unwrap();

        let fresh = AuthSession::new(verifier, store);

        assert_eq!(fresh.current_user(), Some(employee));
    }

    #[test]
    fn corrupt_session_reads_as_signed_out_and_is_removed() {
        let (session, _, store) = session();
        store.set("{\"id\": 42").unwrap();

        assert_eq!(session.current_user(), None);
        assert_eq!(store.get().unwrap(), None);
    }

    #[tokio::test]
    async fn listener_sees_current_state_then_each_change_once() {
        let (session, _, _) = session();
        let seen: Arc<Mutex<Vec<Option<String>>>> = Default::default();
        let sink = Arc::clone(&seen);

        let sub = session.on_auth_state_change(move |user| {
            sink.lock().unwrap().push(user.map(|e| e.id.to_string()))
        });
        assert_eq!(*seen.lock().unwrap(), vec![None]);

        session.login("admin", "admin123").await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![None, Some("admin-001".to_string())]);

        let _ = session.login("admin", "bad").await;
        assert_eq!(seen.lock().unwrap().len(), 2);

        sub.unsubscribe();
        session.logout_and_wait().await;
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn initialize_broadcasts_persisted_user() {
        let (session, _, store) = session();
        let seen: Arc<Mutex<Vec<Option<String>>>> = Default::default();
        let sink = Arc::clone(&seen);
        let _sub = session.on_auth_state_change(move |user| {
            sink.lock().unwrap().push(user.map(|e| e.id.to_string()))
        });

        let employee = Employee::new(EmployeeId::new("manager-001").unwrap(), "Manager", Role::Manager);
        store::save_employee(store.as_ref(), &employee).unwrap();
        session.initialize();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("manager-001".to_string())]
        );
    }

    #[tokio::test]
    async fn relogin_replaces_the_employee_wholesale() {
        let (session, _, store) = session();
        session.login("admin", "admin123").await.unwrap();
        let rep = session.login("sales", "sales123").await.unwrap();

        assert_eq!(session.current_user(), Some(rep.clone()));
        assert_eq!(store::load_employee(store.as_ref()).unwrap(), Some(rep));
        assert!(!session.is_admin());
    }

    /// Memory store whose first `set` stalls after writing, so a second
    /// login can run while the first is still establishing its session.
    struct StallingStore {
        inner: MemorySessionStore,
        stalled: AtomicBool,
        entered: Mutex<Option<std::sync::mpsc::Sender<()>>>,
    }

    impl SessionStore for StallingStore {
        fn get(&self) -> Result<Option<String>, StoreError> {
            self.inner.get()
        }

        fn set(&self, value: &str) -> Result<(), StoreError> {
            self.inner.set(value)?;
            if !self.stalled.swap(true, Ordering::SeqCst) {
                if let Some(tx) = self.entered.lock().unwrap().take() {
                    tx.send(()).unwrap();
                }
                std::thread::sleep(std::time::Duration::from_millis(200));
            }
            Ok(())
        }

        fn clear(&self) -> Result<(), StoreError> {
            self.inner.clear()
        }
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn racing_logins_leave_cache_and_store_in_agreement() {
        let (tx, rx) = std::sync::mpsc::channel();
        let store = Arc::new(StallingStore {
            inner: MemorySessionStore::new(),
            stalled: AtomicBool::new(false),
            entered: Mutex::new(Some(tx)),
        });
        let session = AuthSession::new(Arc::new(StubVerifier::with_demo_accounts()), store.clone());

        let first = session.clone();
        let admin = std::thread::spawn(move || block_on(first.login("admin", "admin123")));
        rx.recv().unwrap();
        block_on(session.login("sales", "sales123")).unwrap();
        admin.join().unwrap().unwrap();

        let cached = session.current_user();
        let persisted = store::load_employee(store.as_ref()).unwrap();
        assert_eq!(cached, persisted);
        assert_eq!(cached.map(|e| e.id.to_string()).as_deref(), Some("sales-001"));
    }
}
