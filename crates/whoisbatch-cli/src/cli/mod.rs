//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load()?;

    // flag > env (handled by clap) > config file
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or_default();
    let api_key = cli
        .api_key
        .or_else(|| config.api_key.clone())
        .filter(|k| !k.trim().is_empty());

    let ctx = commands::Context {
        api_key,
        output_format,
        verbose: cli.verbose,
        no_color: cli.no_color,
        config,
    };

    match cli.command {
        Commands::Lookup(args) => commands::lookup::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(&ctx, args),
    }
}

/// Logs go to stderr so they never mix with result output
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
