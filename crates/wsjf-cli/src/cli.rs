//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WSJF - Weighted Shortest Job First scoring for outline snapshots.
#[derive(Debug, Parser)]
#[command(name = "wsjf")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "WSJF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Factor scale preset, overriding the configured scales
    #[arg(short, long, value_enum, global = true)]
    pub scale: Option<ScalePreset>,

    /// Log intended writes without performing them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (values only)
    Quiet,
}

/// Factor scale presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScalePreset {
    /// 1, 2, 3, 5, 8, 13, 21
    Fibonacci,
    /// 1, 2, 4, 8
    Coarse,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Score a set of factors
    Score(ScoreArgs),

    /// Show the configured factor scales
    Scales,

    /// Recalculate every item on a page of a snapshot
    Recalc(RecalcArgs),

    /// Reconcile one item of a snapshot
    Reconcile(ItemArgs),

    /// Add a migration marker to one item of a snapshot
    Migrate(ItemArgs),
}

/// Arguments for the score command.
#[derive(Debug, Parser)]
pub struct ScoreArgs {
    /// Business value
    #[arg(long)]
    pub bv: f64,

    /// Time criticality
    #[arg(long)]
    pub tc: f64,

    /// Risk reduction / opportunity enablement
    #[arg(long)]
    pub rr: f64,

    /// Job size
    #[arg(long)]
    pub js: f64,
}

/// Arguments for the recalc command.
#[derive(Debug, Parser)]
pub struct RecalcArgs {
    /// JSON outline snapshot
    pub snapshot: PathBuf,

    /// Page to recalculate (defaults to the snapshot's current page)
    #[arg(short, long)]
    pub page: Option<String>,

    /// Write the updated snapshot here instead of in place
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for single-item commands.
#[derive(Debug, Parser)]
pub struct ItemArgs {
    /// JSON outline snapshot
    pub snapshot: PathBuf,

    /// Item UUID
    pub id: String,

    /// Write the updated snapshot here instead of in place
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        let cli = Cli::try_parse_from([
            "wsjf", "score", "--bv", "8", "--tc", "5", "--rr", "3", "--js", "2",
        ])
        .unwrap();
        match cli.command {
            Command::Score(args) => {
                assert_eq!(args.bv, 8.0);
                assert_eq!(args.js, 2.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "wsjf", "recalc", "outline.json", "--page", "Backlog", "--scale", "coarse", "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.scale, Some(ScalePreset::Coarse));
        assert!(cli.dry_run);
        assert!(matches!(
            cli.command,
            Command::Recalc(ref a) if a.page.as_deref() == Some("Backlog")
        ));
    }

    #[test]
    fn test_score_requires_all_factors() {
        assert!(Cli::try_parse_from(["wsjf", "score", "--bv", "8"]).is_err());
    }
}
