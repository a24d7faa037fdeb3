//! Page-level cache policies.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cache scope determining who can cache the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// Cacheable by CDN and browser (shared cache).
    Public,
    /// Cacheable by browser only (private cache).
    Private,
}

impl CacheScope {
    /// Get the Cache-Control directive for this scope.
    pub fn cache_control_directive(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }
}

/// One set of Cache-Control directives.
///
/// Durations are whole seconds. Directives render in a fixed order:
/// `no-store`, scope, `max-age`, `s-maxage`, `stale-while-revalidate`,
/// `stale-if-error`, `must-revalidate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheDirectives {
    /// Forbid any caching.
    #[serde(default)]
    pub no_store: bool,
    /// Explicit scope directive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<CacheScope>,
    /// Browser freshness lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u64>,
    /// Shared cache (CDN) freshness lifetime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_maxage: Option<u64>,
    /// Stale-while-revalidate window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_while_revalidate: Option<u64>,
    /// Stale-if-error window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stale_if_error: Option<u64>,
    /// Require revalidation once stale.
    #[serde(default)]
    pub must_revalidate: bool,
}

impl CacheDirectives {
    /// Directives forbidding any caching.
    pub fn no_store() -> Self {
        Self {
            no_store: true,
            ..Default::default()
        }
    }

    /// Set browser freshness lifetime.
    pub fn with_max_age(mut self, ttl: Duration) -> Self {
        self.max_age = Some(ttl.as_secs());
        self
    }

    /// Set shared cache freshness lifetime.
    pub fn with_s_maxage(mut self, ttl: Duration) -> Self {
        self.s_maxage = Some(ttl.as_secs());
        self
    }

    /// Set stale-while-revalidate window.
    pub fn with_swr(mut self, window: Duration) -> Self {
        self.stale_while_revalidate = Some(window.as_secs());
        self
    }

    /// Set stale-if-error window.
    pub fn with_stale_if_error(mut self, window: Duration) -> Self {
        self.stale_if_error = Some(window.as_secs());
        self
    }

    /// Set the scope directive.
    pub fn with_scope(mut self, scope: CacheScope) -> Self {
        self.scope = Some(scope);
        self
    }

    /// Require revalidation once stale.
    pub fn must_revalidate(mut self) -> Self {
        self.must_revalidate = true;
        self
    }

    /// Generate the Cache-Control header value.
    pub fn header_value(&self) -> String {
        let mut parts = Vec::new();

        if self.no_store {
            parts.push("no-store".to_string());
        }

        if let Some(scope) = self.scope {
            parts.push(scope.cache_control_directive().to_string());
        }

        if let Some(max_age) = self.max_age {
            parts.push(format!("max-age={}", max_age));
        }

        if let Some(s_maxage) = self.s_maxage {
            parts.push(format!("s-maxage={}", s_maxage));
        }

        if let Some(swr) = self.stale_while_revalidate {
            parts.push(format!("stale-while-revalidate={}", swr));
        }

        if let Some(sie) = self.stale_if_error {
            parts.push(format!("stale-if-error={}", sie));
        }

        if self.must_revalidate {
            parts.push("must-revalidate".to_string());
        }

        if parts.is_empty() {
            return "no-store".to_string();
        }

        parts.join(", ")
    }
}

const FIVE_MINUTES: Duration = Duration::from_secs(300);
const ONE_HOUR: Duration = Duration::from_secs(3600);

/// Page cache policy, split by whether the viewer is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCachePolicy {
    /// Directives for responses rendered without a signed-in viewer.
    #[serde(default = "default_anonymous")]
    pub anonymous: CacheDirectives,
    /// Directives for responses rendered for a signed-in viewer.
    #[serde(default = "default_authenticated")]
    pub authenticated: CacheDirectives,
}

fn default_anonymous() -> CacheDirectives {
    CacheDirectives::default()
        .with_max_age(FIVE_MINUTES)
        .with_s_maxage(ONE_HOUR)
        .with_swr(FIVE_MINUTES)
        .must_revalidate()
}

fn default_authenticated() -> CacheDirectives {
    CacheDirectives::default().with_s_maxage(Duration::ZERO)
}

impl Default for PageCachePolicy {
    fn default() -> Self {
        Self {
            anonymous: default_anonymous(),
            authenticated: default_authenticated(),
        }
    }
}

impl PageCachePolicy {
    /// Directives for the given viewer.
    pub fn directives_for(&self, authenticated: bool) -> &CacheDirectives {
        if authenticated {
            &self.authenticated
        } else {
            &self.anonymous
        }
    }

    /// Cache-Control value for the given viewer.
    pub fn cache_control_for(&self, authenticated: bool) -> String {
        self.directives_for(authenticated).header_value()
    }
}
