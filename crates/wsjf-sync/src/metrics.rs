//! Metrics collected across sync operations

/// Cumulative counters for a controller's lifetime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncMetrics {
    /// Single-item reconciliations that ran to completion
    pub items_reconciled: usize,

    /// Canonical score writes (single-item and tree passes)
    pub score_writes: usize,

    /// Background color writes
    pub band_writes: usize,

    /// Derived properties removed
    pub removals: usize,

    /// Tier marker writes or removals during tree passes
    pub tier_writes: usize,

    /// Tree passes that ran to completion
    pub tree_passes: usize,

    /// Migration markers inserted
    pub migrations: usize,

    /// Migrations refused at the cap
    pub migrations_refused: usize,

    /// Operations that failed and were swallowed
    pub failures: usize,
}

impl SyncMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Total property mutations issued
    pub fn total_writes(&self) -> usize {
        self.score_writes + self.band_writes + self.removals + self.tier_writes
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let lines = [
            "Sync Metrics Summary".to_string(),
            "====================".to_string(),
            format!("Items reconciled: {}", self.items_reconciled),
            format!("Tree passes: {}", self.tree_passes),
            format!("Score writes: {}", self.score_writes),
            format!("Background color writes: {}", self.band_writes),
            format!("Tier marker writes: {}", self.tier_writes),
            format!("Removals: {}", self.removals),
            format!("Migrations: {} ({} refused)", self.migrations, self.migrations_refused),
            format!("Failures: {}", self.failures),
        ];
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = SyncMetrics::new();
        assert_eq!(metrics.total_writes(), 0);
        assert_eq!(metrics.failures, 0);
    }

    #[test]
    fn test_total_writes() {
        let metrics = SyncMetrics {
            score_writes: 3,
            band_writes: 2,
            removals: 2,
            tier_writes: 1,
            ..Default::default()
        };
        assert_eq!(metrics.total_writes(), 8);
    }

    #[test]
    fn test_reset() {
        let mut metrics = SyncMetrics {
            items_reconciled: 4,
            failures: 1,
            ..Default::default()
        };
        metrics.reset();
        assert_eq!(metrics, SyncMetrics::default());
    }

    #[test]
    fn test_summary() {
        let metrics = SyncMetrics {
            tree_passes: 1,
            score_writes: 5,
            migrations: 2,
            migrations_refused: 1,
            ..Default::default()
        };
        let summary = metrics.summary();
        assert!(summary.contains("Tree passes: 1"));
        assert!(summary.contains("Score writes: 5"));
        assert!(summary.contains("Migrations: 2 (1 refused)"));
    }
}
