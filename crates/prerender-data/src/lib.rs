//! Data-fetching client used during the prefetch pass.
//!
//! A `GraphQlClient` is created for each request. It forwards the
//! viewer's cookies to the GraphQL endpoint and remembers every result so
//! the markup pass can read them synchronously and the page can ship them
//! to the browser.

mod client;
mod config;
mod error;
mod query;

pub use client::*;
pub use config::*;
pub use error::*;
pub use query::*;
