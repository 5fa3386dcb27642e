//! WSJF CLI - Weighted Shortest Job First scoring for outline snapshots.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wsjf_cli::commands;
use wsjf_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    // Initialize tracing (log to stderr, RUST_LOG overrides)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> wsjf_cli::Result<()> {
    let cli = Cli::parse();

    // Explicit config paths must load; the default one is created on first use
    let mut config = match cli.config.as_deref() {
        Some(path) => Config::load_from(path)?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("Using default configuration: {}", e);
            Config::default()
        }),
    };
    if cli.config.is_none() {
        if let Ok(path) = Config::path() {
            if !path.exists() {
                config.save().ok();
            }
        }
    }

    config.apply_overrides(cli.scale, cli.dry_run);

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Score(args) => commands::execute_score(args, config.batch_sync(), &formatter)?,
        Command::Scales => commands::execute_scales(&config.sync, &formatter)?,
        Command::Recalc(args) => {
            commands::execute_recalc(args, config.batch_sync(), &formatter).await?
        }
        Command::Reconcile(args) => {
            commands::execute_reconcile(args, config.batch_sync(), &formatter).await?
        }
        Command::Migrate(args) => {
            commands::execute_migrate(args, config.batch_sync(), &formatter).await?
        }
    }

    Ok(())
}
