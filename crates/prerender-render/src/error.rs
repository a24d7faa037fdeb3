//! Render errors.

use prerender_data::DataError;
use prerender_template::TemplateError;

/// Errors raised while rendering a page.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("component {component} failed: {message}")]
    Component { component: String, message: String },

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

impl RenderError {
    /// Error raised by a component's own logic.
    pub fn component(component: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Component {
            component: component.into(),
            message: message.into(),
        }
    }
}
