//! Render settings.

use serde::{Deserialize, Serialize};

/// What to send when the prefetch pass fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefetchFailurePolicy {
    /// Respond 500 with an empty body.
    #[default]
    Fail,
    /// Respond 200 with an empty root container; the client renders from scratch.
    ClientOnly,
}

/// How the document around the markup is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentMode {
    /// Fill the build's `index.html`, read on every request.
    #[default]
    Template,
    /// Generate header and footer in code; no template file is read.
    Shell,
}

fn default_embed_data() -> bool {
    true
}

/// Render behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default)]
    pub prefetch_failure: PrefetchFailurePolicy,

    #[serde(default)]
    pub document: DocumentMode,

    /// Ship fetched query results to the client as `window.__DATA__`.
    #[serde(default = "default_embed_data")]
    pub embed_data: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            prefetch_failure: PrefetchFailurePolicy::default(),
            document: DocumentMode::default(),
            embed_data: default_embed_data(),
        }
    }
}
