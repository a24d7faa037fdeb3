//! Build artifact discovery: asset manifest and entry bundle.
//!
//! Both are produced by the client build and loaded once at startup.
//! A missing or malformed artifact means the build is incomplete and the
//! server refuses to start.
//!
//! - `AssetManifest` - Chunk name to built file mapping, code-split resolution
//! - `EntryBundle` - Main bundle discovered in the static js directory

mod entry;
mod error;
mod manifest;

pub use entry::*;
pub use error::*;
pub use manifest::*;
