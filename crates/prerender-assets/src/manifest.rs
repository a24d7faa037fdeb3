//! Asset manifest: logical chunk name to built file path.

use std::path::Path;

use crate::error::AssetError;

/// Mapping from logical chunk name to physical built-asset path.
///
/// Entries keep the order of the manifest file. Loaded once at startup
/// and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetManifest {
    entries: Vec<(String, String)>,
}

impl AssetManifest {
    /// Build a manifest from ordered entries.
    pub fn from_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Parse manifest JSON.
    ///
    /// Only string values are kept; nested sections such as
    /// `entrypoints` are ignored.
    pub fn from_json(path: &Path, json: &str) -> Result<Self, AssetError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|source| AssetError::ManifestParse {
                path: path.to_path_buf(),
                source,
            })?;

        let serde_json::Value::Object(map) = value else {
            return Err(AssetError::ManifestNotObject(path.to_path_buf()));
        };

        let entries = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(file) => Some((key, file)),
                _ => None,
            })
            .collect();

        Ok(Self { entries })
    }

    /// Read and parse the manifest file.
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let json = std::fs::read_to_string(path).map_err(|source| AssetError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Self::from_json(path, &json)?;
        tracing::info!(path = %path.display(), entries = manifest.len(), "asset manifest loaded");
        Ok(manifest)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the manifest has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the built file for a manifest key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate entries in manifest order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Built files for the chunks used during a render.
    ///
    /// A manifest key matches when, with a trailing `.js` stripped, it
    /// equals one of `used`. Results follow manifest order, not `used` order.
    pub fn resolve<S: AsRef<str>>(&self, used: &[S]) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(key, _)| {
                let chunk = key.strip_suffix(".js").unwrap_or(key);
                used.iter().any(|u| u.as_ref() == chunk)
            })
            .map(|(_, file)| file.as_str())
            .collect()
    }

    /// Script tags for the chunks used during a render.
    pub fn script_tags<S: AsRef<str>>(&self, used: &[S]) -> Vec<String> {
        self.resolve(used)
            .into_iter()
            .map(chunk_script_tag)
            .collect()
    }
}

/// Script tag for a code-split chunk, with the path rooted at `/`.
pub fn chunk_script_tag(file: &str) -> String {
    format!(
        r#"<script type="text/javascript" src="/{}"></script>"#,
        file.trim_start_matches('/')
    )
}
