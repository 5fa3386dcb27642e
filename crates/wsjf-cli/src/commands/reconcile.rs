//! Reconcile command implementation.

use super::{finish, open_snapshot};
use crate::cli::ItemArgs;
use crate::error::Result;
use crate::output::Formatter;
use wsjf_domain::ItemId;
use wsjf_sync::{SyncConfig, SyncController};

/// Execute the reconcile command.
pub async fn execute_reconcile(
    args: ItemArgs,
    config: SyncConfig,
    formatter: &Formatter,
) -> Result<()> {
    let id = ItemId::parse(&args.id)?;
    let host = open_snapshot(&args.snapshot)?;
    let controller = SyncController::new(host, config);

    let outcome = controller.reconcile_item(id).await;

    finish(&controller, &args.snapshot, args.output, formatter)?;
    println!("{}", formatter.format_item_outcome(&outcome)?);
    Ok(())
}
