//! Prerender - server-side page renderer for a client-built application.
//!
//! Commands:
//! - `prerender serve` - Serve rendered pages over HTTP
//! - `prerender check` - Validate configuration and build artifacts
//! - `prerender config` - Print or write the default configuration

mod app;
mod commands;
mod config;
mod context;
mod output;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{CheckArgs, ConfigArgs, ServeArgs};

/// Prerender - Serve server-rendered pages of a client-built application
#[derive(Parser)]
#[command(name = "prerender")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve rendered pages
    Serve(ServeArgs),

    /// Validate configuration and build artifacts
    Check(CheckArgs),

    /// Print or write the default configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args, &ctx).await,
        Commands::Check(args) => commands::check::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
