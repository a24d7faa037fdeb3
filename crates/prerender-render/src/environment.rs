//! Process-wide render environment.

use prerender_assets::{AssetError, AssetManifest, EntryBundle};
use prerender_cache::PageCachePolicy;
use prerender_core::{BuildPaths, SessionConfig};
use prerender_data::GraphQlConfig;
use prerender_store::StoreFactory;
use prerender_template::{ShellConfig, ShellTemplate};

use crate::config::RenderConfig;

/// Everything a render needs that does not change between requests.
///
/// Built once at startup and shared behind an `Arc`; never mutated
/// afterwards.
#[derive(Debug, Clone)]
pub struct RenderEnvironment {
    build: BuildPaths,
    manifest: AssetManifest,
    entry: EntryBundle,
    cache_policy: PageCachePolicy,
    render: RenderConfig,
    graphql: GraphQlConfig,
    stores: StoreFactory,
    shell: ShellTemplate,
    http: reqwest::Client,
}

impl RenderEnvironment {
    /// Create an environment from already-loaded build artifacts.
    pub fn new(build: BuildPaths, manifest: AssetManifest, entry: EntryBundle) -> Self {
        let shell = ShellTemplate::new(ShellConfig::default(), entry.src());
        Self {
            build,
            manifest,
            entry,
            cache_policy: PageCachePolicy::default(),
            render: RenderConfig::default(),
            graphql: GraphQlConfig::default(),
            stores: StoreFactory::default(),
            shell,
            http: reqwest::Client::new(),
        }
    }

    /// Load the manifest and discover the entry bundle.
    ///
    /// Fails when the client build has not run.
    pub fn load(build: BuildPaths) -> Result<Self, AssetError> {
        let manifest = AssetManifest::load(&build.manifest)?;
        let entry = EntryBundle::discover(&build.static_js_dir)?;
        Ok(Self::new(build, manifest, entry))
    }

    /// Set the page cache policy.
    pub fn with_cache_policy(mut self, policy: PageCachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Set render behavior.
    pub fn with_render_config(mut self, config: RenderConfig) -> Self {
        self.render = config;
        self
    }

    /// Set the GraphQL endpoint.
    pub fn with_graphql(mut self, config: GraphQlConfig) -> Self {
        self.graphql = config;
        self
    }

    /// Set how sessions are recognised.
    pub fn with_session(mut self, session: SessionConfig) -> Self {
        self.stores = StoreFactory::new(session);
        self
    }

    /// Set the static parts of the generated shell.
    pub fn with_shell(mut self, config: ShellConfig) -> Self {
        self.shell = ShellTemplate::new(config, self.entry.src());
        self
    }

    /// Use a specific HTTP client for GraphQL queries.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Build artifact locations.
    pub fn build(&self) -> &BuildPaths {
        &self.build
    }

    /// Asset manifest.
    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// Entry bundle.
    pub fn entry(&self) -> &EntryBundle {
        &self.entry
    }

    /// Page cache policy.
    pub fn cache_policy(&self) -> &PageCachePolicy {
        &self.cache_policy
    }

    /// Render behavior.
    pub fn render_config(&self) -> &RenderConfig {
        &self.render
    }

    /// GraphQL endpoint.
    pub fn graphql(&self) -> &GraphQlConfig {
        &self.graphql
    }

    /// Store factory.
    pub fn stores(&self) -> &StoreFactory {
        &self.stores
    }

    /// Generated shell.
    pub fn shell(&self) -> &ShellTemplate {
        &self.shell
    }

    /// Shared HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_build_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("static/js")).unwrap();
        std::fs::write(dir.path().join("static/js/main.abc.js"), "").unwrap();
        std::fs::write(
            dir.path().join("asset-manifest.json"),
            r#"{"about.js": "/static/js/about.1.js"}"#,
        )
        .unwrap();

        let env = RenderEnvironment::load(BuildPaths::from_build_dir(dir.path())).unwrap();
        assert_eq!(env.entry().file_name(), "main.abc.js");
        assert_eq!(env.shell().entry_src(), "/static/js/main.abc.js");
        assert_eq!(env.manifest().len(), 1);
    }

    #[test]
    fn test_load_without_build() {
        let dir = tempfile::tempdir().unwrap();
        let err = RenderEnvironment::load(BuildPaths::from_build_dir(dir.path())).unwrap_err();
        assert!(matches!(err, AssetError::ManifestRead { .. }));
    }

    #[test]
    fn test_session_config_reaches_factory() {
        let env = RenderEnvironment::new(
            BuildPaths::default(),
            AssetManifest::default(),
            EntryBundle::new("bundle.js"),
        )
        .with_session(SessionConfig::default().with_cookie_name("sid"));

        assert_eq!(env.stores().session_cookie(), "sid");
    }
}
