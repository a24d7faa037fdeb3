//! Structured logging for the page prerender server.
//!
//! This crate provides:
//! - `LoggingConfig` / `init_logging` - Process-wide `tracing` subscriber setup
//! - `RequestLogger` - Request-scoped structured logging with typed fields
//! - `render_span` - Span carrying request id, path and viewer

mod logging;
mod span;

pub use logging::*;
pub use span::*;

// Re-export RequestId and TimingContext from prerender-core for convenience
pub use prerender_core::{RequestId, TimingContext};
