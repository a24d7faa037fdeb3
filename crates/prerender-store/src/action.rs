//! Actions and the reducer applying them.

use serde_json::Value;

use crate::state::{AppState, AuthState, Location, RESERVED_DOMAINS};

/// Authentication actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Mark the viewer identified by the session value as signed in.
    SetCurrentUser(String),
    /// Mark the viewer as signed out.
    Logout,
}

/// Routing actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterAction {
    /// Initial location of the page being rendered.
    LocationChanged {
        pathname: String,
        search: Option<String>,
    },
}

/// Every state change goes through one of these.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Auth(AuthAction),
    Router(RouterAction),
    /// Replace an application domain.
    SetDomain { key: String, value: Value },
    /// Shallow-merge an object into an application domain.
    MergeDomain { key: String, value: Value },
}

impl Action {
    /// Sign the viewer in.
    pub fn set_current_user(user: impl Into<String>) -> Self {
        Self::Auth(AuthAction::SetCurrentUser(user.into()))
    }

    /// Sign the viewer out.
    pub fn logout() -> Self {
        Self::Auth(AuthAction::Logout)
    }

    /// Replace an application domain.
    pub fn set_domain(key: impl Into<String>, value: Value) -> Self {
        Self::SetDomain {
            key: key.into(),
            value,
        }
    }

    /// Shallow-merge into an application domain.
    pub fn merge_domain(key: impl Into<String>, value: Value) -> Self {
        Self::MergeDomain {
            key: key.into(),
            value,
        }
    }

    /// Short name used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(AuthAction::SetCurrentUser(_)) => "auth/set-current-user",
            Self::Auth(AuthAction::Logout) => "auth/logout",
            Self::Router(RouterAction::LocationChanged { .. }) => "router/location-changed",
            Self::SetDomain { .. } => "domain/set",
            Self::MergeDomain { .. } => "domain/merge",
        }
    }
}

/// Outcome of applying an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The state changed (or was rewritten to the same value).
    Updated,
    /// The action targeted a reserved domain and was dropped.
    Rejected,
}

impl AppState {
    /// Apply an action to the state.
    pub fn apply(&mut self, action: Action) -> Applied {
        match action {
            Action::Auth(AuthAction::SetCurrentUser(user)) => {
                self.auth = AuthState::signed_in(user);
            }
            Action::Auth(AuthAction::Logout) => {
                self.auth = AuthState::signed_out();
            }
            Action::Router(RouterAction::LocationChanged { pathname, search }) => {
                self.router.location = Location {
                    pathname,
                    search: search
                        .filter(|s| !s.is_empty())
                        .map(|s| format!("?{}", s.trim_start_matches('?')))
                        .unwrap_or_default(),
                    hash: String::new(),
                };
            }
            Action::SetDomain { key, value } => {
                if is_reserved(&key) {
                    return Applied::Rejected;
                }
                self.domains.insert(key, value);
            }
            Action::MergeDomain { key, value } => {
                if is_reserved(&key) {
                    return Applied::Rejected;
                }
                let slot = self.domains.entry(key).or_insert(Value::Null);
                match (slot, value) {
                    (Value::Object(existing), Value::Object(incoming)) => {
                        existing.extend(incoming);
                    }
                    (slot, value) => *slot = value,
                }
            }
        }
        Applied::Updated
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_DOMAINS.contains(&key)
}
