//! Command implementations.

pub mod migrate;
pub mod recalc;
pub mod reconcile;
pub mod scales;
pub mod score;

pub use self::migrate::execute_migrate;
pub use self::recalc::execute_recalc;
pub use self::reconcile::execute_reconcile;
pub use self::scales::execute_scales;
pub use self::score::execute_score;

use crate::error::Result;
use crate::output::Formatter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wsjf_host::MemoryHost;
use wsjf_sync::{SyncConfig, SyncController};

/// Load a snapshot into an in-memory host.
pub(crate) fn open_snapshot(path: &Path) -> Result<Arc<MemoryHost>> {
    tracing::debug!("Loading snapshot {}", path.display());
    Ok(Arc::new(MemoryHost::from_json_file(path)?))
}

/// Print the messages the controller showed, then persist the snapshot.
///
/// Nothing is written in dry-run mode.
pub(crate) fn finish(
    controller: &SyncController<MemoryHost>,
    snapshot: &Path,
    output: Option<PathBuf>,
    formatter: &Formatter,
) -> Result<()> {
    let host = controller.host();
    for message in host.messages() {
        eprintln!("{}", formatter.format_message(&message));
    }

    let config: &SyncConfig = controller.config();
    if config.dry_run {
        eprintln!("{}", formatter.info("Dry run: snapshot left unchanged"));
        return Ok(());
    }

    let target = output.unwrap_or_else(|| snapshot.to_path_buf());
    if host.journal().is_empty() && target == snapshot {
        tracing::debug!("No mutations; snapshot not rewritten");
        return Ok(());
    }
    host.save_json_file(&target)?;
    tracing::info!("Snapshot written to {}", target.display());
    Ok(())
}
