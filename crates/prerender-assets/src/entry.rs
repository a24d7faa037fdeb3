//! Entry bundle discovery.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::AssetError;

/// Public path the static js directory is served under.
pub const STATIC_JS_PREFIX: &str = "/static/js";

/// `main.<hash>.js` in production builds, `bundle.js` in development.
fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(main|bundle)\.(?:.*\.)?js$").expect("entry bundle pattern is valid")
    })
}

/// Whether a filename looks like the entry bundle.
pub fn is_entry_bundle(file_name: &str) -> bool {
    entry_pattern().is_match(file_name)
}

/// The application's main bundle, discovered once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryBundle {
    file_name: String,
}

impl EntryBundle {
    /// Use a known bundle filename.
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Scan the static js directory for the entry bundle.
    ///
    /// Filenames are checked in sorted order so the pick is deterministic.
    pub fn discover(dir: &Path) -> Result<Self, AssetError> {
        let read_dir = std::fs::read_dir(dir).map_err(|source| AssetError::BundleDirUnreadable {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut names: Vec<String> = read_dir
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();

        let file_name = names
            .into_iter()
            .find(|name| is_entry_bundle(name))
            .ok_or_else(|| AssetError::EntryBundleMissing(dir.to_path_buf()))?;

        tracing::info!(dir = %dir.display(), bundle = %file_name, "entry bundle discovered");
        Ok(Self { file_name })
    }

    /// Bundle filename.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Public script src for the bundle.
    pub fn src(&self) -> String {
        format!("{}/{}", STATIC_JS_PREFIX, self.file_name)
    }
}
