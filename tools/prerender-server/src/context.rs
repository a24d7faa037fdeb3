//! CLI execution context.

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use prerender_sdk::prelude::BuildPaths;

use crate::config::ServerConfig;
use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["prerender.toml", ".prerender.toml", "prerender.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// Server configuration.
    pub config: ServerConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// Config file the configuration came from, if any.
    pub config_path: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (ServerConfig::load(path)?, Some(PathBuf::from(path))),
            None => match Self::find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (ServerConfig::default(), None),
            },
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(ServerConfig, PathBuf)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = ServerConfig::load(config_path.to_str()?) {
                        return Some((config, config_path));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Build artifact locations resolved against the working directory.
    pub fn build_paths(&self) -> BuildPaths {
        let build = &self.config.build;
        BuildPaths {
            template: self.resolve_path(&build.template),
            manifest: self.resolve_path(&build.manifest),
            static_js_dir: self.resolve_path(&build.static_js_dir),
        }
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context_in(cwd: &Path) -> Context {
        Context {
            config: ServerConfig::default(),
            output: Output::new(false, true),
            cwd: cwd.to_path_buf(),
            config_path: None,
        }
    }

    #[test]
    fn test_build_paths_resolved_against_cwd() {
        let ctx = context_in(Path::new("/srv/app"));
        let paths = ctx.build_paths();
        assert_eq!(paths.template, PathBuf::from("/srv/app/build/index.html"));
        assert_eq!(paths.static_js_dir, PathBuf::from("/srv/app/build/static/js"));
    }

    #[test]
    fn test_absolute_path_kept() {
        let ctx = context_in(Path::new("/srv/app"));
        assert_eq!(
            ctx.resolve_path(Path::new("/var/build/index.html")),
            PathBuf::from("/var/build/index.html")
        );
    }

    #[test]
    fn test_find_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("prerender.toml"),
            "[server]\nbind = \"127.0.0.1:4000\"\n",
        )
        .unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let (config, path) = Context::find_config(&nested).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:4000");
        assert_eq!(path, dir.path().join("prerender.toml"));
    }
}
