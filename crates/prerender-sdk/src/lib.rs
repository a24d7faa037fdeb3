//! Public SDK for the server-side page prerenderer.
//!
//! This crate re-exports all renderer functionality:
//!
//! ```ignore
//! use prerender_sdk::prelude::*;
//!
//! struct Home;
//!
//! #[async_trait]
//! impl Component for Home {
//!     fn name(&self) -> &str {
//!         "home"
//!     }
//!
//!     async fn prefetch(&self, scope: &PrefetchScope<'_>) -> Result<(), RenderError> {
//!         let data = scope.query(&QueryRequest::new("{ featured { id } }")).await?;
//!         scope.dispatch(Action::set_domain("home", data));
//!         Ok(())
//!     }
//!
//!     fn render(&self, scope: &mut RenderScope<'_>, children: String) -> String {
//!         scope.set_title("Home");
//!         format!("<main>{children}</main>")
//!     }
//! }
//! ```

pub use async_trait::async_trait;
pub use prerender_assets;
pub use prerender_cache;
pub use prerender_core;
pub use prerender_data;
pub use prerender_observability;
pub use prerender_render;
pub use prerender_store;
pub use prerender_template;

/// Prelude for convenient imports.
pub mod prelude {
    pub use async_trait::async_trait;
    pub use prerender_assets::*;
    pub use prerender_cache::*;
    pub use prerender_core::*;
    pub use prerender_data::*;
    pub use prerender_observability::*;
    pub use prerender_render::*;
    pub use prerender_store::*;
    pub use prerender_template::*;
}
