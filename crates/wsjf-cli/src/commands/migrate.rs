//! Migrate command implementation.

use super::{finish, open_snapshot};
use crate::cli::ItemArgs;
use crate::error::Result;
use crate::output::Formatter;
use wsjf_domain::ItemId;
use wsjf_sync::{SyncConfig, SyncController};

/// Execute the migrate command.
pub async fn execute_migrate(
    args: ItemArgs,
    config: SyncConfig,
    formatter: &Formatter,
) -> Result<()> {
    let id = ItemId::parse(&args.id)?;
    let host = open_snapshot(&args.snapshot)?;
    let controller = SyncController::new(host, config);

    let outcome = controller.mark_migrated(id).await;

    finish(&controller, &args.snapshot, args.output, formatter)?;
    println!("{}", formatter.format_migration(&outcome)?);
    Ok(())
}
