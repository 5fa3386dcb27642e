//! Change-driven reconciliation

use crate::{ItemOutcome, SyncController};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Duration;
use wsjf_domain::traits::{ChangeEvent, DocumentHost};
use wsjf_domain::{FactorSet, ItemId};

/// Counters from a watcher run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WatchReport {
    /// Change events received
    pub events: usize,
    /// Items that resolved at least one factor and were reconciled
    pub reconciled: usize,
    /// Items ignored because no factor resolved
    pub ignored: usize,
    /// Reconciliations that failed
    pub failed: usize,
}

/// Reconciles items the host reports as changed
///
/// Opt-in: nothing listens unless a watcher is started on the receiving end
/// of a channel registered with the host.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use tokio::sync::mpsc;
/// use wsjf_domain::traits::UiHost;
/// use wsjf_host::MemoryHost;
/// use wsjf_sync::{ChangeWatcher, SyncConfig, SyncController};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let host = Arc::new(MemoryHost::new());
///     let (tx, rx) = mpsc::unbounded_channel();
///     host.register_change_listener(tx).await?;
///
///     let controller = Arc::new(SyncController::new(host, SyncConfig::default()));
///     let report = ChangeWatcher::new(controller).run(rx).await;
///     println!("{:?}", report);
///     Ok(())
/// }
/// ```
pub struct ChangeWatcher<H> {
    controller: Arc<SyncController<H>>,
    debounce: Duration,
}

impl<H: DocumentHost> ChangeWatcher<H> {
    /// Create a watcher using the controller's configured debounce
    pub fn new(controller: Arc<SyncController<H>>) -> Self {
        let debounce = controller.config().change_debounce();
        Self { controller, debounce }
    }

    /// Run until the channel closes
    pub async fn run(&self, mut events: UnboundedReceiver<ChangeEvent>) -> WatchReport {
        tracing::info!("Change watcher started (debounce: {:?})", self.debounce);

        let mut report = WatchReport::default();
        while let Some(event) = events.recv().await {
            self.handle(event, &mut report).await;
        }

        tracing::info!(
            "Change watcher stopped: {} events, {} reconciled, {} ignored, {} failed",
            report.events,
            report.reconciled,
            report.ignored,
            report.failed
        );
        report
    }

    async fn handle(&self, event: ChangeEvent, report: &mut WatchReport) {
        report.events += 1;

        let ids: Vec<ItemId> = event
            .items
            .iter()
            .filter(|item| {
                let relevant = FactorSet::from_properties(&item.properties).any_resolved();
                if !relevant {
                    report.ignored += 1;
                }
                relevant
            })
            .map(|item| item.id)
            .collect();

        if ids.is_empty() {
            return;
        }

        tracing::debug!("{} changed item(s) carry factors", ids.len());
        if !self.debounce.is_zero() {
            tokio::time::sleep(self.debounce).await;
        }

        for id in ids {
            match self.controller.reconcile_item(id).await {
                ItemOutcome::Failed => report.failed += 1,
                _ => report.reconciled += 1,
            }
        }
    }
}
