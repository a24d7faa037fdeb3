//! CLI command implementations.

pub mod check;
pub mod config;
pub mod serve;

use anyhow::{Context as _, Result};
use clap::Args;
use prerender_sdk::prelude::RenderEnvironment;

use crate::context::Context;

/// Arguments for the serve command.
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind (overrides `server.bind`).
    #[arg(short, long)]
    pub bind: Option<String>,
}

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Also send a probe query to the GraphQL endpoint.
    #[arg(long)]
    pub ping: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    /// Write prerender.toml to the working directory instead of printing it.
    #[arg(short, long)]
    pub write: bool,

    /// Overwrite an existing prerender.toml.
    #[arg(short, long)]
    pub force: bool,
}

/// Build the render environment described by the configuration.
pub fn build_environment(ctx: &Context) -> Result<RenderEnvironment> {
    let config = &ctx.config;

    let http = reqwest::Client::builder()
        .timeout(config.server.upstream_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let env = RenderEnvironment::load(ctx.build_paths())
        .context("Client build not found; run the client build first")?
        .with_cache_policy(config.cache.clone())
        .with_render_config(config.render.clone())
        .with_graphql(config.graphql.clone())
        .with_session(config.session.clone())
        .with_shell(config.shell.clone())
        .with_http_client(http);

    Ok(env)
}
