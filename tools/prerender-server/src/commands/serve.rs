//! Serve command - render pages over HTTP.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::http::HeaderName;
use prerender_sdk::prelude::{init_logging, PageRenderer};

use super::{build_environment, ServeArgs};
use crate::app;
use crate::context::Context;
use crate::server::{self, AppState};

/// Run the serve command.
pub async fn run(args: ServeArgs, ctx: &Context) -> Result<()> {
    let config = &ctx.config;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let env = build_environment(ctx)?;
    ctx.output.debug(&format!("Entry bundle: {}", env.entry().src()));
    ctx.output
        .debug(&format!("Code-split chunks: {}", env.manifest().len()));

    let mut state = AppState::new(PageRenderer::new(Arc::new(env), app::root()));
    if let Some(header) = &config.session.trusted_user_header {
        let header = HeaderName::from_bytes(header.as_bytes())
            .with_context(|| format!("Invalid trusted user header: {}", header))?;
        ctx.output
            .info(&format!("Trusting viewer identity from {}", header.as_str()));
        state = state.with_trusted_user_header(header);
    }

    let bind = args.bind.as_deref().unwrap_or(&config.server.bind);
    ctx.output.success(&format!("Serving pages on http://{}", bind));

    server::serve(bind, server::build_router(state)).await
}
