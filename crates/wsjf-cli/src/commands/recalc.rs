//! Recalc command implementation.

use super::{finish, open_snapshot};
use crate::cli::RecalcArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use wsjf_sync::{SyncConfig, SyncController, TreeOutcome};

/// Execute the recalc command.
pub async fn execute_recalc(
    args: RecalcArgs,
    config: SyncConfig,
    formatter: &Formatter,
) -> Result<()> {
    let host = open_snapshot(&args.snapshot)?;
    let controller = SyncController::new(host, config);

    let outcome = match args.page.as_deref() {
        Some(page) => controller.reconcile_tree(page).await,
        None => controller.reconcile_current_page().await,
    };

    finish(&controller, &args.snapshot, args.output, formatter)?;

    match outcome {
        TreeOutcome::Completed(report) => {
            println!("{}", formatter.format_tree_report(&report)?);
            tracing::debug!("\n{}", formatter.format_metrics(&controller.metrics()));
            Ok(())
        }
        TreeOutcome::NoPage => Err(CliError::Failed("No page to recalculate".to_string())),
        TreeOutcome::Failed => Err(CliError::Failed("Recalculation failed".to_string())),
    }
}
