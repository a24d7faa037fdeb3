//! Page render orchestration.
//!
//! A page is produced in two passes over a tree of `Component`s:
//!
//! 1. Prefetch - every component's data dependencies are awaited and the
//!    code-split modules the page needs are recorded.
//! 2. Markup - the tree renders to a string from the now-complete state.
//!
//! `PageRenderer` wraps both passes with store and client setup, asset
//! resolution, document assembly and response headers.

mod component;
mod config;
mod environment;
mod error;
mod renderer;
mod tree;

#[cfg(test)]
mod testing;

pub use component::*;
pub use config::*;
pub use environment::*;
pub use error::*;
pub use renderer::*;
pub use tree::*;
