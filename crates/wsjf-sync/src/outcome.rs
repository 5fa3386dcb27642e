//! Results of the controller's entry points
//!
//! Entry points never return errors; failures are logged and reported to the
//! user, and the outcome records what happened.

use wsjf_domain::Score;

/// Result of single-item reconciliation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemOutcome {
    /// Item missing or without any properties; nothing touched
    Skipped,
    /// Factors complete; derived properties brought in line with `score`
    Scored {
        /// Freshly computed score
        score: Score,
        /// Property mutations issued
        writes: usize,
    },
    /// Factors incomplete; derived properties removed
    Cleared {
        /// Property mutations issued
        writes: usize,
    },
    /// Host call failed part way; earlier writes stand
    Failed,
}

impl ItemOutcome {
    /// Property mutations issued, zero for skipped or failed runs
    pub fn writes(&self) -> usize {
        match self {
            ItemOutcome::Scored { writes, .. } | ItemOutcome::Cleared { writes } => *writes,
            ItemOutcome::Skipped | ItemOutcome::Failed => 0,
        }
    }
}

/// Counters from one tree pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeReport {
    /// Page that was walked
    pub page: String,
    /// Items visited, with or without properties
    pub visited: usize,
    /// Items with a defined score
    pub scored: usize,
    /// Items whose canonical score was written
    pub updated: usize,
    /// Tier marker writes or removals
    pub tier_writes: usize,
}

/// Result of a tree pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOutcome {
    /// No page open, no usable page name, or no such page
    NoPage,
    /// Walked the whole tree
    Completed(TreeReport),
    /// Aborted at the first failure; earlier writes stand
    Failed,
}

/// Result of marking an item as migrated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Item missing or has no content
    Skipped,
    /// Marker inserted
    Migrated {
        /// Migrations still allowed
        remaining: usize,
        /// Content after insertion
        content: String,
    },
    /// Cap already reached; content untouched
    LimitReached,
    /// Host call failed
    Failed,
}
