//! Config command - print or write the default configuration.

use anyhow::{bail, Context as _, Result};

use super::ConfigArgs;
use crate::config::generate_default_config;
use crate::context::{Context, CONFIG_NAMES};

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    let content = generate_default_config();

    if !args.write {
        print!("{}", content);
        return Ok(());
    }

    let path = ctx.cwd.join(CONFIG_NAMES[0]);
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    std::fs::write(&path, content)
        .with_context(|| format!("Failed to write config file: {}", path.display()))?;
    ctx.output.success(&format!("Wrote {}", path.display()));

    Ok(())
}
