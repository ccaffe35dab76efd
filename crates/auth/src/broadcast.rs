//! Auth-state change fan-out.
//!
//! - Synchronous delivery, registration order
//! - A panicking listener is logged and skipped; the rest still run
//! - The registry lock is never held while a listener runs, so listeners may
//!   subscribe or unsubscribe from inside a callback

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use pharmacrm_core::Employee;

type Listener = Arc<dyn Fn(Option<&Employee>) + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Registry of auth-change listeners.
#[derive(Clone, Default)]
pub struct AuthBroadcaster {
    registry: Arc<Mutex<Registry>>,
}

impl AuthBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener`, then call it once with `current`.
    pub fn subscribe<F>(&self, listener: F, current: Option<&Employee>) -> AuthSubscription
    where
        F: Fn(Option<&Employee>) + Send + Sync + 'static,
    {
        let listener: Listener = Arc::new(listener);
        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.listeners.push((id, Arc::clone(&listener)));
            id
        };

        invoke(id, &listener, current);

        AuthSubscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `user` to every registered listener.
    pub fn notify(&self, user: Option<&Employee>) {
        let snapshot: Vec<(u64, Listener)> = self.lock().listeners.clone();
        tracing::debug!(
            listeners = snapshot.len(),
            employee_id = user.map(|e| e.id.as_str()),
            "broadcasting auth change"
        );
        for (id, listener) in &snapshot {
            invoke(*id, listener, user);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.lock().listeners.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        // Listeners never run under the lock, so poisoning carries no torn state.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for AuthBroadcaster {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthBroadcaster")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn invoke(id: u64, listener: &Listener, user: Option<&Employee>) {
    if let Err(panic) = catch_unwind(AssertUnwindSafe(|| listener(user))) {
        let message = panic
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| panic.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        tracing::error!(listener = id, panic = %message, "auth change listener panicked");
    }
}

/// Handle returned by [`AuthBroadcaster::subscribe`].
///
/// Dropping the handle does *not* unsubscribe.
#[derive(Debug, Clone)]
#[must_use = "keep the subscription to be able to unsubscribe"]
pub struct AuthSubscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl AuthSubscription {
    /// Remove this listener. Calling it again is a no-op.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .listeners
                .retain(|(id, _)| *id != self.id);
        }
    }
}
