//! Server configuration.

use std::time::Duration;

use anyhow::{Context, Result};
use prerender_sdk::prelude::{
    BuildPaths, GraphQlConfig, LoggingConfig, PageCachePolicy, RenderConfig, SessionConfig,
    ShellConfig,
};
use serde::{Deserialize, Serialize};

/// Server configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listener settings.
    #[serde(default)]
    pub server: ListenConfig,

    /// Client build artifact locations.
    #[serde(default)]
    pub build: BuildPaths,

    /// GraphQL API used during prefetch.
    #[serde(default)]
    pub graphql: GraphQlConfig,

    /// Session recognition.
    #[serde(default)]
    pub session: SessionConfig,

    /// Page cache headers.
    #[serde(default)]
    pub cache: PageCachePolicy,

    /// Render behavior.
    #[serde(default)]
    pub render: RenderConfig,

    /// Structured logging.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Generated document shell.
    #[serde(default)]
    pub shell: ShellConfig,
}

impl ServerConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenConfig {
    /// Address to bind (default: 0.0.0.0:3000).
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Timeout for each GraphQL request, in seconds.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_secs: u64,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_upstream_timeout() -> u64 {
    10
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            upstream_timeout_secs: default_upstream_timeout(),
        }
    }
}

impl ListenConfig {
    /// Timeout for each GraphQL request.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}

/// Generate a default prerender.toml config file.
pub fn generate_default_config() -> String {
    r#"# Prerender server configuration

[server]
bind = "0.0.0.0:3000"
upstream_timeout_secs = 10

[build]
template = "build/index.html"
manifest = "build/asset-manifest.json"
static_js_dir = "build/static/js"

[graphql]
endpoint = "http://localhost:4000/graphql"
# subscriptions_endpoint = "ws://localhost:4000/graphql"

[session]
cookie_name = "session"
# trusted_user_header = "x-authenticated-user"

[cache.anonymous]
max_age = 300
s_maxage = 3600
stale_while_revalidate = 300
must_revalidate = true

[cache.authenticated]
s_maxage = 0

[render]
prefetch_failure = "fail"
document = "template"
embed_data = true

[logging]
level = "info"
format = "json"
"#
    .to_string()
}
