//! Build output and session configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Locations of the client build artifacts, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPaths {
    /// HTML document template produced by the client build.
    #[serde(default = "default_template")]
    pub template: PathBuf,
    /// Asset manifest mapping chunk names to built files.
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Directory holding the built JavaScript bundles.
    #[serde(default = "default_static_js")]
    pub static_js_dir: PathBuf,
}

fn default_template() -> PathBuf {
    PathBuf::from("build/index.html")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("build/asset-manifest.json")
}

fn default_static_js() -> PathBuf {
    PathBuf::from("build/static/js")
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self {
            template: default_template(),
            manifest: default_manifest(),
            static_js_dir: default_static_js(),
        }
    }
}

impl BuildPaths {
    /// Derive all paths from a single build directory.
    pub fn from_build_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            template: dir.join("index.html"),
            manifest: dir.join("asset-manifest.json"),
            static_js_dir: dir.join("static").join("js"),
        }
    }
}

/// How the viewer's session is recognised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Cookie whose presence marks a signed-in viewer.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Header set by a trusted upstream proxy with the authenticated user id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trusted_user_header: Option<String>,
}

fn default_cookie_name() -> String {
    "session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            trusted_user_header: None,
        }
    }
}

impl SessionConfig {
    /// Use a different session cookie name.
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Trust a proxy header carrying the authenticated user id.
    pub fn with_trusted_user_header(mut self, header: impl Into<String>) -> Self {
        self.trusted_user_header = Some(header.into());
        self
    }
}
