//! Cache-Control policy for prerendered pages.
//!
//! Anonymous pages are identical for every viewer and may be held by a
//! shared cache (CDN); pages rendered for a signed-in viewer must not be.
//!
//! # Example
//!
//! ```ignore
//! use prerender_cache::{CacheHeadersBuilder, PageCachePolicy};
//!
//! let policy = PageCachePolicy::default();
//! let headers = CacheHeadersBuilder::new()
//!     .cache_control_for(&policy, ctx.is_authenticated())
//!     .build();
//! ```

mod headers;
mod policy;

pub use headers::*;
pub use policy::*;
