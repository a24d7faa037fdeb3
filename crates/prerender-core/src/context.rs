//! Request context for a single page render.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use serde::{Deserialize, Serialize};

use crate::cookies::Cookies;
use crate::lifecycle::TimingContext;

/// Unique request identifier for tracing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new request ID.
    pub fn generate() -> Self {
        static COUNTER: AtomicU32 = AtomicU32::new(0);

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let seq = COUNTER.fetch_add(1, Ordering::Relaxed);

        Self(format!("{:x}-{:x}-{:x}", nanos, std::process::id(), seq))
    }

    /// Create from an existing ID string.
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// HTTP headers.
pub type Headers = HashMap<String, String>;

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Other,
}

impl From<&http::Method> for Method {
    fn from(method: &http::Method) -> Self {
        match *method {
            http::Method::GET => Self::Get,
            http::Method::HEAD => Self::Head,
            http::Method::POST => Self::Post,
            _ => Self::Other,
        }
    }
}

/// Identity of a viewer authenticated by upstream middleware.
///
/// Its presence switches the response to user-specific caching.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    /// Create a new authenticated user marker.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the user identifier.
    pub fn id(&self) -> &str {
        &self.0
    }
}

/// Per-request context handed to the render pipeline.
///
/// Built once from the inbound request and never mutated afterwards,
/// apart from the timing marks recorded along the way.
#[derive(Debug)]
pub struct RequestContext {
    /// Unique request identifier.
    pub request_id: RequestId,
    /// HTTP method.
    pub method: Method,
    /// Request path (without query string).
    pub path: String,
    /// Raw query string, without the leading `?`.
    pub query: Option<String>,
    /// HTTP headers (names lowercased).
    pub headers: Headers,
    /// Parsed request cookies.
    pub cookies: Cookies,
    /// Viewer identity attached by upstream middleware.
    pub user: Option<AuthenticatedUser>,
    /// Timing context for observability.
    pub timing: TimingContext,
}

impl RequestContext {
    /// Create a new request context from a method and a url (path plus optional query).
    pub fn new(method: Method, url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (url.to_string(), None),
        };

        Self {
            request_id: RequestId::generate(),
            method,
            path: if path.is_empty() { "/".to_string() } else { path },
            query: query.filter(|q| !q.is_empty()),
            headers: HashMap::new(),
            cookies: Cookies::default(),
            user: None,
            timing: TimingContext::new(),
        }
    }

    /// Use an explicit request ID (e.g. propagated from a proxy).
    pub fn with_request_id(mut self, id: RequestId) -> Self {
        self.request_id = id;
        self
    }

    /// Add a header. A `Cookie` header is also parsed into `cookies`.
    ///
    /// Repeated `Cookie` headers are joined with `; `.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let name = name.to_ascii_lowercase();
        let mut value = value.into();
        if name == "cookie" {
            if let Some(existing) = self.headers.get(&name) {
                value = format!("{existing}; {value}");
            }
            self.cookies = Cookies::parse(&value);
        }
        self.headers.insert(name, value);
        self
    }

    /// Attach the authenticated viewer.
    pub fn with_user(mut self, user: AuthenticatedUser) -> Self {
        self.user = Some(user);
        self
    }

    /// Get the full url (path plus query string).
    pub fn url(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(|s| s.as_str())
    }

    /// Raw `Cookie` header, forwarded to upstream data services.
    pub fn cookie_header(&self) -> Option<&str> {
        self.header("cookie")
    }

    /// Get a cookie value by name.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name)
    }

    /// Whether upstream middleware authenticated the viewer.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // === RequestId Tests ===

    #[test]
    fn test_request_id_generate_unique() {
        let a = RequestId::generate();
        let b = RequestId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_request_id_display() {
        let id = RequestId::from_string("req-1");
        assert_eq!(id.to_string(), "req-1");
        assert_eq!(id.as_str(), "req-1");
    }

    // === RequestContext Tests ===

    #[test]
    fn test_context_splits_query() {
        let ctx = RequestContext::new(Method::Get, "/about?tab=team");
        assert_eq!(ctx.path, "/about");
        assert_eq!(ctx.query.as_deref(), Some("tab=team"));
        assert_eq!(ctx.url(), "/about?tab=team");
    }

    #[test]
    fn test_context_empty_path_is_root() {
        let ctx = RequestContext::new(Method::Get, "?x=1");
        assert_eq!(ctx.path, "/");
        assert_eq!(ctx.url(), "/?x=1");
    }

    #[test]
    fn test_context_empty_query_dropped() {
        let ctx = RequestContext::new(Method::Get, "/a?");
        assert_eq!(ctx.query, None);
        assert_eq!(ctx.url(), "/a");
    }

    #[test]
    fn test_context_header_case_insensitive() {
        let ctx = RequestContext::new(Method::Get, "/").with_header("Accept-Language", "en");
        assert_eq!(ctx.header("accept-language"), Some("en"));
        assert_eq!(ctx.header("ACCEPT-LANGUAGE"), Some("en"));
    }

    #[test]
    fn test_context_cookie_header_parsed() {
        let ctx = RequestContext::new(Method::Get, "/").with_header("Cookie", "session=abc; theme=dark");
        assert_eq!(ctx.cookie("session"), Some("abc"));
        assert_eq!(ctx.cookie("theme"), Some("dark"));
        assert_eq!(ctx.cookie_header(), Some("session=abc; theme=dark"));
    }

    #[test]
    fn test_context_repeated_cookie_headers_joined() {
        let ctx = RequestContext::new(Method::Get, "/")
            .with_header("cookie", "session=alice")
            .with_header("Cookie", "theme=dark");
        assert_eq!(ctx.cookie("session"), Some("alice"));
        assert_eq!(ctx.cookie("theme"), Some("dark"));
        assert_eq!(ctx.cookie_header(), Some("session=alice; theme=dark"));
    }

    #[test]
    fn test_context_user_marker() {
        let ctx = RequestContext::new(Method::Get, "/");
        assert!(!ctx.is_authenticated());

        let ctx = ctx.with_user(AuthenticatedUser::new("u-1"));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.user.as_ref().map(|u| u.id()), Some("u-1"));
    }

    #[test]
    fn test_method_from_http() {
        assert_eq!(Method::from(&http::Method::GET), Method::Get);
        assert_eq!(Method::from(&http::Method::HEAD), Method::Head);
        assert_eq!(Method::from(&http::Method::DELETE), Method::Other);
    }
}
