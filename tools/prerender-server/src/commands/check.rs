//! Check command - validate configuration and build artifacts.

use anyhow::{Context as _, Result};
use prerender_sdk::prelude::{DocumentMode, DocumentTemplate, GraphQlClient, QueryRequest};
use serde_json::json;

use super::{build_environment, CheckArgs};
use crate::context::Context;
use crate::output::check_badge;

/// Query sent by `--ping`.
const PROBE_QUERY: &str = "{ __typename }";

/// Run the check command.
pub async fn run(args: CheckArgs, ctx: &Context) -> Result<()> {
    let output = &ctx.output;
    output.header("Checking prerender setup");

    match &ctx.config_path {
        Some(path) => output.kv("Config", &path.display().to_string()),
        None => output.kv("Config", "defaults"),
    }

    let env = build_environment(ctx)?;
    output.kv("Entry bundle", &env.entry().src());
    output.kv("Code-split chunks", &env.manifest().len().to_string());
    if ctx.output.is_verbose() {
        for (chunk, file) in env.manifest().iter() {
            output.list_item(&format!("{} -> {}", chunk, file));
        }
    }

    let template_title = match env.render_config().document {
        DocumentMode::Template => {
            let path = &env.build().template;
            let template = DocumentTemplate::load(path)
                .await
                .with_context(|| format!("Template {} is unusable", path.display()))?;
            output.kv("Template", &format!("{} {}", path.display(), check_badge(true)));
            template.title().map(str::to_string)
        }
        DocumentMode::Shell => {
            output.kv("Document", "generated shell");
            None
        }
    };

    output.kv("GraphQL endpoint", &env.graphql().endpoint);
    if args.ping {
        let client = GraphQlClient::new(env.http().clone(), env.graphql().clone());
        client
            .query(&QueryRequest::new(PROBE_QUERY))
            .await
            .with_context(|| format!("GraphQL endpoint {} did not answer", env.graphql().endpoint))?;
        output.success("GraphQL endpoint answered");
    } else {
        output.warn("GraphQL endpoint not probed (use --ping)");
    }

    let anonymous = env.cache_policy().cache_control_for(false);
    let authenticated = env.cache_policy().cache_control_for(true);
    output.kv("Cache-Control (anonymous)", &anonymous);
    output.kv("Cache-Control (signed in)", &authenticated);

    if output.is_json() {
        output.json(&json!({
            "entry": env.entry().src(),
            "chunks": env.manifest().len(),
            "template_title": template_title,
            "graphql_endpoint": env.graphql().endpoint,
            "cache_control": {
                "anonymous": anonymous,
                "authenticated": authenticated,
            },
        }));
    } else {
        output.success("Setup looks good");
    }

    Ok(())
}
