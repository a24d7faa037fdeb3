//! The per-request store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use crate::action::{Action, Applied};
use crate::state::AppState;

/// State container for one request.
///
/// Not `Clone`: a store belongs to exactly one render. Dispatch takes
/// `&self` so concurrently awaited prefetches can share it.
#[derive(Debug, Default)]
pub struct Store {
    state: Mutex<AppState>,
    dispatched: AtomicUsize,
}

impl Store {
    /// Create a store with an initial state.
    pub fn new(initial: AppState) -> Self {
        Self {
            state: Mutex::new(initial),
            dispatched: AtomicUsize::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Apply an action.
    pub fn dispatch(&self, action: Action) {
        let kind = action.kind();
        match self.lock().apply(action) {
            Applied::Updated => {
                self.dispatched.fetch_add(1, Ordering::Relaxed);
                tracing::trace!(action = kind, "action dispatched");
            }
            Applied::Rejected => {
                tracing::warn!(action = kind, "action targets a reserved domain, ignored");
            }
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AppState {
        self.lock().clone()
    }

    /// Read the state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.lock())
    }

    /// Current value of an application domain.
    pub fn domain(&self, key: &str) -> Option<serde_json::Value> {
        self.lock().domains.get(key).cloned()
    }

    /// Whether the viewer is signed in according to the auth domain.
    pub fn is_authenticated(&self) -> bool {
        self.lock().auth.is_authenticated
    }

    /// Number of applied actions.
    pub fn dispatched(&self) -> usize {
        self.dispatched.load(Ordering::Relaxed)
    }

    /// The whole state as JSON.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&*self.lock()).unwrap_or(serde_json::Value::Null)
    }
}
