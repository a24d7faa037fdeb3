//! Response header assembly.

use prerender_core::RequestContext;

use crate::policy::PageCachePolicy;

/// Header names set on page responses.
pub mod header_names {
    /// Standard cache control header.
    pub const CACHE_CONTROL: &str = "Cache-Control";
    /// Request ID for tracing.
    pub const X_REQUEST_ID: &str = "X-Request-ID";
}

/// Builder for page response headers.
#[derive(Debug, Default)]
pub struct CacheHeadersBuilder {
    cache_control: Option<String>,
    request_id: Option<String>,
}

impl CacheHeadersBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefill headers for a request: cache policy for its viewer plus its request id.
    pub fn for_request(policy: &PageCachePolicy, ctx: &RequestContext) -> Self {
        Self::new()
            .cache_control_for(policy, ctx.is_authenticated())
            .request_id(ctx.request_id.as_str())
    }

    /// Set Cache-Control header.
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Set Cache-Control from the page policy for the given viewer.
    pub fn cache_control_for(mut self, policy: &PageCachePolicy, authenticated: bool) -> Self {
        self.cache_control = Some(policy.cache_control_for(authenticated));
        self
    }

    /// Set X-Request-ID header.
    pub fn request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    /// Build the headers.
    pub fn build(self) -> Vec<(&'static str, String)> {
        let mut headers = Vec::new();

        if let Some(cc) = self.cache_control {
            headers.push((header_names::CACHE_CONTROL, cc));
        }

        if let Some(id) = self.request_id {
            headers.push((header_names::X_REQUEST_ID, id));
        }

        headers
    }
}
