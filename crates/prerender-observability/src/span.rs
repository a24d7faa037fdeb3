//! Request spans and request id propagation.

use prerender_core::{RequestContext, RequestId};

/// Header carrying a request id assigned by an upstream proxy.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// W3C trace context header.
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Extract the trace id from a W3C `traceparent` header.
///
/// Format: `{version}-{trace_id}-{span_id}-{flags}`
/// Example: `00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01`
pub fn trace_id_from_traceparent(header: &str) -> Option<&str> {
    let parts: Vec<&str> = header.trim().split('-').collect();
    if parts.len() != 4 || parts[0] != "00" {
        return None;
    }

    let trace_id = parts[1];
    let valid = trace_id.len() == 32
        && trace_id.bytes().all(|b| b.is_ascii_hexdigit())
        && trace_id.bytes().any(|b| b != b'0');

    valid.then_some(trace_id)
}

/// Pick the request id for an inbound request.
///
/// Prefers an explicit `x-request-id`, then the trace id of a
/// `traceparent` header, and generates a fresh id otherwise.
pub fn incoming_request_id<'a>(header: impl Fn(&str) -> Option<&'a str>) -> RequestId {
    if let Some(id) = header(REQUEST_ID_HEADER).map(str::trim).filter(|id| !id.is_empty()) {
        return RequestId::from_string(id);
    }

    header(TRACEPARENT_HEADER)
        .and_then(trace_id_from_traceparent)
        .map(RequestId::from_string)
        .unwrap_or_else(RequestId::generate)
}

/// Span wrapping one page render.
pub fn render_span(ctx: &RequestContext) -> tracing::Span {
    tracing::info_span!(
        "page_render",
        request_id = %ctx.request_id,
        path = %ctx.path,
        user = ctx.user.as_ref().map(|u| u.id()).unwrap_or("-"),
    )
}
