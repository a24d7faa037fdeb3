//! Template errors.

use std::path::PathBuf;

/// Errors while loading, parsing or filling a template.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed template: missing {0}")]
    Malformed(&'static str),

    #[error("failed to serialize page state: {0}")]
    Serialize(#[from] serde_json::Error),
}
