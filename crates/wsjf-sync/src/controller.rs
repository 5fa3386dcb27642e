//! Core sync controller: keeps derived score properties in line with inputs

use crate::{
    ItemOutcome, MigrationOutcome, SyncConfig, SyncError, SyncMetrics, TreeOutcome, TreeReport,
};
use std::fmt::Display;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use wsjf_domain::traits::{DocumentHost, MessageLevel};
use wsjf_domain::{compute_score, keys, migration};
use wsjf_domain::{ColorBand, FactorSet, Item, ItemId, Properties, PropertyValue, Score, Tier};

fn host_error<E: Display>(e: E) -> SyncError {
    SyncError::Host(e.to_string())
}

/// Everything derived from one item's properties
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    /// Resolved inputs
    pub factors: FactorSet,
    /// Score, when the inputs are complete and job size is non-zero
    pub score: Option<Score>,
    /// Coarse background color band
    pub band: Option<ColorBand>,
    /// Fine tier relative to the scale maximum
    pub tier: Option<Tier>,
}

/// Whether the stored canonical score already equals `score`
fn stored_score_matches(properties: &Properties, score: Score) -> bool {
    properties
        .get(keys::SCORE)
        .is_some_and(|stored| score.matches(stored))
}

/// Sync controller for derived WSJF properties
///
/// The derived properties (canonical score, legacy score, background color,
/// tier marker) are a cache owned by this controller. Whatever is stored is
/// corrected, never trusted as input.
///
/// Every entry point is best-effort: host failures are logged, reported to
/// the user where the operation is user-facing, and swallowed. Writes that
/// landed before a failure are not rolled back.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use wsjf_host::MemoryHost;
/// use wsjf_sync::{SyncConfig, SyncController};
///
/// # async fn demo() {
/// let host = Arc::new(MemoryHost::new());
/// let controller = SyncController::new(host, SyncConfig::default());
/// let outcome = controller.reconcile_current_page().await;
/// println!("{:?}", outcome);
/// # }
/// ```
pub struct SyncController<H> {
    host: Arc<H>,
    config: SyncConfig,
    metrics: Mutex<SyncMetrics>,
}

impl<H: DocumentHost> SyncController<H> {
    /// Create a controller over `host`
    pub fn new(host: Arc<H>, config: SyncConfig) -> Self {
        Self {
            host,
            config,
            metrics: Mutex::new(SyncMetrics::new()),
        }
    }

    /// The host this controller writes to
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    /// Active configuration
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Snapshot of the counters
    pub fn metrics(&self) -> SyncMetrics {
        self.lock_metrics().clone()
    }

    /// Reset counters
    pub fn reset_metrics(&self) {
        self.lock_metrics().reset();
    }

    fn lock_metrics(&self) -> MutexGuard<'_, SyncMetrics> {
        self.metrics.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, update: impl FnOnce(&mut SyncMetrics)) {
        update(&mut self.lock_metrics());
    }

    /// Resolve factors and derive score, band and tier
    pub fn evaluate(&self, properties: &Properties) -> Evaluation {
        let factors = FactorSet::from_properties(properties);
        let score = compute_score(&factors);
        Evaluation {
            factors,
            score,
            band: score.and_then(|s| self.config.bands.classify(s)),
            tier: score.and_then(|s| self.config.tiers.classify(s, self.config.max_score())),
        }
    }

    /// Reconcile one item's derived properties with its factors
    ///
    /// With complete factors: sets or clears the background color band,
    /// drops the legacy lowercase score, and writes the canonical score only
    /// when the stored value differs. With incomplete factors: removes every
    /// derived property that is present. Items without properties are left
    /// alone.
    pub async fn reconcile_item(&self, id: ItemId) -> ItemOutcome {
        match self.try_reconcile_item(id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(item = %id, "Error updating WSJF: {}", e);
                self.record(|m| m.failures += 1);
                ItemOutcome::Failed
            }
        }
    }

    async fn try_reconcile_item(&self, id: ItemId) -> Result<ItemOutcome, SyncError> {
        let Some(item) = self.host.get_item(id, false).await.map_err(host_error)? else {
            tracing::debug!(item = %id, "Item not found, skipping");
            return Ok(ItemOutcome::Skipped);
        };
        if !item.has_properties() {
            return Ok(ItemOutcome::Skipped);
        }

        let evaluation = self.evaluate(&item.properties);
        let mut writes = 0;

        let outcome = match evaluation.score {
            Some(score) => {
                match evaluation.band {
                    Some(band) => {
                        let changed = self
                            .set_text_if_changed(&item, keys::BACKGROUND_COLOR, band.as_str())
                            .await?;
                        if changed {
                            writes += 1;
                            self.record(|m| m.band_writes += 1);
                        }
                    }
                    None => {
                        if self.remove_if_present(&item, keys::BACKGROUND_COLOR).await? {
                            writes += 1;
                            self.record(|m| m.removals += 1);
                        }
                    }
                }

                if self.remove_if_present(&item, keys::LEGACY_SCORE).await? {
                    writes += 1;
                    self.record(|m| m.removals += 1);
                }

                if !stored_score_matches(&item.properties, score) {
                    self.upsert(id, keys::SCORE, PropertyValue::Number(score.value())).await?;
                    writes += 1;
                    self.record(|m| m.score_writes += 1);
                }

                tracing::debug!(item = %id, %score, writes, "Item scored");
                ItemOutcome::Scored { score, writes }
            }
            None => {
                let derived = [
                    keys::SCORE,
                    keys::LEGACY_SCORE,
                    keys::BACKGROUND_COLOR,
                    keys::COLOR_LEVEL,
                ];
                for key in derived {
                    if self.remove_if_present(&item, key).await? {
                        writes += 1;
                        self.record(|m| m.removals += 1);
                    }
                }

                let missing = evaluation.factors.missing();
                tracing::debug!(item = %id, ?missing, writes, "Item cleared");
                ItemOutcome::Cleared { writes }
            }
        };

        self.record(|m| m.items_reconciled += 1);
        Ok(outcome)
    }

    /// Recalculate scores across the page that is currently open
    pub async fn reconcile_current_page(&self) -> TreeOutcome {
        let page = match self.host.current_page().await {
            Ok(page) => page,
            Err(e) => return self.tree_failed(host_error(e)).await,
        };
        let Some(page) = page else {
            self.notify("No page is currently open", MessageLevel::Warning).await;
            return TreeOutcome::NoPage;
        };
        let Some(name) = page.display_name() else {
            self.notify("Could not get page name", MessageLevel::Error).await;
            return TreeOutcome::NoPage;
        };
        self.reconcile_tree(name).await
    }

    /// Recalculate scores across every item of a page
    ///
    /// Walks the tree depth-first, parent before children, awaiting each
    /// mutation before moving on. The walk is sequential so that the host
    /// sees at most one mutation in flight. For every item with complete
    /// factors the canonical score is written if it changed and the tier
    /// marker is set or removed. The first failure aborts the walk.
    pub async fn reconcile_tree(&self, page_name: &str) -> TreeOutcome {
        match self.try_reconcile_tree(page_name).await {
            Ok(Some(report)) => {
                tracing::info!(
                    page = %report.page,
                    visited = report.visited,
                    scored = report.scored,
                    updated = report.updated,
                    tier_writes = report.tier_writes,
                    "Tree pass completed"
                );
                self.record(|m| m.tree_passes += 1);
                self.notify(
                    &format!("WSJF calculation complete: {} blocks updated", report.updated),
                    MessageLevel::Success,
                )
                .await;
                TreeOutcome::Completed(report)
            }
            Ok(None) => {
                tracing::warn!(page = page_name, "Page not found");
                self.notify(&format!("Page '{}' not found", page_name), MessageLevel::Warning)
                    .await;
                TreeOutcome::NoPage
            }
            Err(e) => self.tree_failed(e).await,
        }
    }

    async fn try_reconcile_tree(&self, page_name: &str) -> Result<Option<TreeReport>, SyncError> {
        let Some(roots) = self.host.page_item_tree(page_name).await.map_err(host_error)? else {
            return Ok(None);
        };

        let mut report = TreeReport {
            page: page_name.to_string(),
            ..Default::default()
        };

        // Pre-order: reversed pushes keep document order when popping
        let mut stack: Vec<&Item> = roots.iter().rev().collect();
        while let Some(item) = stack.pop() {
            report.visited += 1;
            if item.has_properties() {
                self.reconcile_tree_item(item, &mut report).await?;
            }
            stack.extend(item.children.iter().rev());
        }

        Ok(Some(report))
    }

    async fn reconcile_tree_item(
        &self,
        item: &Item,
        report: &mut TreeReport,
    ) -> Result<(), SyncError> {
        let evaluation = self.evaluate(&item.properties);
        let Some(score) = evaluation.score else {
            return Ok(());
        };
        report.scored += 1;

        if !stored_score_matches(&item.properties, score) {
            self.upsert(item.id, keys::SCORE, PropertyValue::Number(score.value())).await?;
            report.updated += 1;
            self.record(|m| m.score_writes += 1);
        }

        let tier_changed = match evaluation.tier {
            Some(tier) => self.set_text_if_changed(item, keys::COLOR_LEVEL, tier.as_str()).await?,
            None => self.remove_if_present(item, keys::COLOR_LEVEL).await?,
        };
        if tier_changed {
            report.tier_writes += 1;
            self.record(|m| m.tier_writes += 1);
        }

        Ok(())
    }

    async fn tree_failed(&self, e: SyncError) -> TreeOutcome {
        tracing::error!("Error updating page WSJF: {}", e);
        self.record(|m| m.failures += 1);
        self.notify("Error calculating WSJF", MessageLevel::Error).await;
        TreeOutcome::Failed
    }

    /// Insert a migration marker into an item's content
    ///
    /// The marker goes after a leading task-status keyword, or at the start.
    /// Refused with a warning once the configured maximum is present.
    pub async fn mark_migrated(&self, id: ItemId) -> MigrationOutcome {
        match self.try_mark_migrated(id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(item = %id, "Error migrating task: {}", e);
                self.record(|m| m.failures += 1);
                self.notify("Error migrating task", MessageLevel::Error).await;
                MigrationOutcome::Failed
            }
        }
    }

    async fn try_mark_migrated(&self, id: ItemId) -> Result<MigrationOutcome, SyncError> {
        let Some(item) = self.host.get_item(id, false).await.map_err(host_error)? else {
            return Ok(MigrationOutcome::Skipped);
        };
        if item.content.is_empty() {
            return Ok(MigrationOutcome::Skipped);
        }

        let marker = self.config.migration_marker.as_str();
        let max = self.config.max_migrations;
        let existing = migration::count_markers(&item.content, marker);

        let Some(remaining) = migration::remaining_after(existing, max) else {
            tracing::warn!(item = %id, existing, "Migration limit reached");
            self.record(|m| m.migrations_refused += 1);
            self.notify(
                &format!(
                    "Task already migrated {} times! Consider breaking it down or removing it.",
                    max
                ),
                MessageLevel::Warning,
            )
            .await;
            return Ok(MigrationOutcome::LimitReached);
        };

        let content = migration::insert_marker(&item.content, marker);
        if self.config.dry_run {
            tracing::info!(item = %id, content = %content, "DRY RUN: would update content");
        } else {
            self.host.update_content(id, &content).await.map_err(host_error)?;
        }
        self.record(|m| m.migrations += 1);

        if remaining > 0 {
            let plural = if remaining > 1 { "s" } else { "" };
            self.notify(
                &format!("Task migrated ({} migration{} remaining)", remaining, plural),
                MessageLevel::Success,
            )
            .await;
        } else {
            self.notify("Task migrated (final migration)", MessageLevel::Warning)
                .await;
        }

        Ok(MigrationOutcome::Migrated { remaining, content })
    }

    /// Show a message; failure to show it is logged, not propagated
    pub(crate) async fn notify(&self, text: &str, level: MessageLevel) {
        if let Err(e) = self.host.show_message(text, level).await {
            tracing::warn!(%level, "Failed to show message: {}", e);
        }
    }

    async fn upsert(&self, id: ItemId, key: &str, value: PropertyValue) -> Result<(), SyncError> {
        if self.config.dry_run {
            tracing::info!(item = %id, key, value = %value, "DRY RUN: would set property");
            return Ok(());
        }
        self.host.upsert_property(id, key, value).await.map_err(host_error)
    }

    async fn remove_if_present(&self, item: &Item, key: &str) -> Result<bool, SyncError> {
        if !item.properties.contains_key(key) {
            return Ok(false);
        }
        if self.config.dry_run {
            tracing::info!(item = %item.id, key, "DRY RUN: would remove property");
        } else {
            self.host.remove_property(item.id, key).await.map_err(host_error)?;
        }
        Ok(true)
    }

    async fn set_text_if_changed(
        &self,
        item: &Item,
        key: &str,
        value: &str,
    ) -> Result<bool, SyncError> {
        if matches!(item.property(key), Some(PropertyValue::Text(current)) if current == value) {
            return Ok(false);
        }
        self.upsert(item.id, key, PropertyValue::from(value)).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wsjf_host::MemoryHost;

    fn controller(host: &Arc<MemoryHost>) -> SyncController<MemoryHost> {
        SyncController::new(Arc::clone(host), SyncConfig::immediate())
    }

    #[test]
    fn test_evaluate_complete() {
        let host = Arc::new(MemoryHost::new());
        let props: Properties = [
            (".bv", 8.0),
            (".tc", 5.0),
            (".rr", 3.0),
            (".js", 2.0),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), PropertyValue::Number(v)))
        .collect();

        let evaluation = controller(&host).evaluate(&props);
        assert_eq!(evaluation.score, Some(Score::from_value(8.0)));
        assert_eq!(evaluation.band, Some(ColorBand::Green));
        // 8 / 63 is 13 percent of the Fibonacci maximum
        assert_eq!(evaluation.tier, None);
    }

    #[test]
    fn test_evaluate_coarse_scale() {
        let host = Arc::new(MemoryHost::new());
        let controller = SyncController::new(host, SyncConfig::coarse());
        let props: Properties = [("bv", 8.0), ("tc", 5.0), ("rr", 3.0), ("js", 2.0)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), PropertyValue::Number(v)))
            .collect();

        assert_eq!(controller.evaluate(&props).tier, Some(Tier::Low));
    }

    #[test]
    fn test_stored_score_comparison() {
        let score = Score::from_value(8.0);
        let mut props = Properties::new();
        assert!(!stored_score_matches(&props, score));

        props.insert(keys::SCORE.to_string(), PropertyValue::Number(8.0));
        assert!(stored_score_matches(&props, score));

        props.insert(keys::SCORE.to_string(), PropertyValue::Text("8".into()));
        assert!(stored_score_matches(&props, score));

        props.insert(keys::SCORE.to_string(), PropertyValue::Number(7.5));
        assert!(!stored_score_matches(&props, score));

        props.insert(keys::SCORE.to_string(), PropertyValue::Number(8.004));
        assert!(!stored_score_matches(&props, score));

        props.insert(keys::SCORE.to_string(), PropertyValue::Text("8 - stale note".into()));
        assert!(!stored_score_matches(&props, score));
    }

    #[tokio::test]
    async fn test_missing_item_is_skipped() {
        let host = Arc::new(MemoryHost::new());
        let outcome = controller(&host).reconcile_item(ItemId::new()).await;
        assert_eq!(outcome, ItemOutcome::Skipped);
        assert!(host.journal().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_issues_no_writes() {
        let host = Arc::new(MemoryHost::new());
        let item = Item::new("task")
            .with_property(".bv", 8.0)
            .with_property(".tc", 5.0)
            .with_property(".rr", 3.0)
            .with_property(".js", 2.0)
            .with_property("wsjf", 1.0);
        let id = item.id;
        host.add_page("Backlog", vec![item]);

        let config = SyncConfig {
            dry_run: true,
            ..SyncConfig::immediate()
        };
        let controller = SyncController::new(Arc::clone(&host), config);

        let outcome = controller.reconcile_item(id).await;
        assert_eq!(outcome.writes(), 3);
        assert!(host.journal().is_empty());
        assert_eq!(controller.metrics().total_writes(), 3);
    }
}
