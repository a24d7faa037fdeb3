//! Serializable application state.

use serde::{Deserialize, Serialize};

/// Domain keys owned by the built-in state slices.
pub const RESERVED_DOMAINS: &[&str] = &["auth", "router"];

/// Authentication slice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Whether a viewer is signed in.
    pub is_authenticated: bool,
    /// Session value identifying the signed-in viewer.
    pub current_user: Option<String>,
}

impl AuthState {
    /// Signed-in state for a viewer.
    pub fn signed_in(user: impl Into<String>) -> Self {
        Self {
            is_authenticated: true,
            current_user: Some(user.into()),
        }
    }

    /// Signed-out state.
    pub fn signed_out() -> Self {
        Self::default()
    }
}

/// Current location, as the client router expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Path component.
    pub pathname: String,
    /// Query string including the leading `?`, or empty.
    pub search: String,
    /// Fragment; always empty on the server.
    pub hash: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
        }
    }
}

/// Router slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterState {
    /// Current location.
    pub location: Location,
    /// Last history action; `POP` for an initial page load.
    pub action: String,
}

impl Default for RouterState {
    fn default() -> Self {
        Self {
            location: Location::default(),
            action: "POP".to_string(),
        }
    }
}

/// Whole state tree, keyed by feature domain.
///
/// Application domains serialize next to `auth` and `router`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Authentication domain.
    pub auth: AuthState,
    /// Routing domain.
    pub router: RouterState,
    /// Application-defined domains.
    #[serde(flatten)]
    pub domains: serde_json::Map<String, serde_json::Value>,
}
