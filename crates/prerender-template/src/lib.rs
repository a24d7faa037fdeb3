//! HTML document templates for server-rendered pages.
//!
//! Two ways to produce a page:
//! - `DocumentTemplate` - the build's `index.html`, parsed into typed
//!   segments and filled through `DocumentSlots`
//! - `ShellTemplate` - a fixed header and footer generated in code
//!
//! Both embed state through `serialize_state`, which is safe to place
//! inside a `<script>` element.

mod document;
mod error;
mod escape;
mod head;
mod shell;

pub use document::*;
pub use error::*;
pub use escape::*;
pub use head::*;
pub use shell::*;
