//! Core request abstractions for the page prerender server.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - `RequestContext` - Per-request url, cookies and viewer identity
//! - `Cookies` - Parsed `Cookie` header
//! - `BuildPaths` / `SessionConfig` - Process-wide configuration sections
//! - `RenderPhase` / `TimingContext` - Request lifecycle tracking

mod config;
mod context;
mod cookies;
mod lifecycle;

pub use config::*;
pub use context::*;
pub use cookies::*;
pub use lifecycle::*;
