//! Startup errors for build artifacts.

use std::path::PathBuf;

use thiserror::Error;

/// Hint appended to every artifact error.
const BUILD_HINT: &str = "run the client build before starting the server";

/// Errors raised while loading build artifacts.
#[derive(Error, Debug)]
pub enum AssetError {
    /// Manifest file could not be read.
    #[error("failed to read asset manifest {path}: {source} ({hint})", hint = BUILD_HINT)]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid JSON.
    #[error("failed to parse asset manifest {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Manifest JSON is not an object.
    #[error("asset manifest {0} is not a JSON object")]
    ManifestNotObject(PathBuf),

    /// Static js directory could not be listed.
    #[error("failed to list bundles in {path}: {source} ({hint})", hint = BUILD_HINT)]
    BundleDirUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No file in the static js directory looks like the entry bundle.
    #[error("no entry bundle found in {0} ({hint})", hint = BUILD_HINT)]
    EntryBundleMissing(PathBuf),
}
