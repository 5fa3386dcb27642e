//! Migration markers - text rules for "carried over" tasks
//!
//! A task moved forward to a later plan gets a marker token in its content.
//! The marker goes right after a leading task-status keyword when there is
//! one, otherwise at the very start. The number of markers is capped.

use regex::Regex;
use std::sync::LazyLock;

/// Marker token inserted on each migration
pub const MARKER: &str = "➡️";

/// Default cap on markers per item
pub const MAX_MIGRATIONS: usize = 3;

/// Leading task-status keyword followed by whitespace
static STATUS_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(TODO|LATER|NOW|DOING|DONE|WAITING|CANCELED|CANCELLED|IN-PROGRESS)\s+")
        .expect("status prefix pattern is valid")
});

/// Count literal occurrences of `marker` in `content`
pub fn count_markers(content: &str, marker: &str) -> usize {
    if marker.is_empty() {
        return 0;
    }
    content.matches(marker).count()
}

/// Length of the status keyword prefix (including trailing whitespace)
pub fn status_prefix_len(content: &str) -> Option<usize> {
    STATUS_PREFIX.find(content).map(|m| m.end())
}

/// Insert one marker after the status keyword, or at the start
///
/// # Examples
///
/// ```
/// use wsjf_domain::migration::{insert_marker, MARKER};
///
/// assert_eq!(insert_marker("TODO write report", MARKER), "TODO ➡️ write report");
/// assert_eq!(insert_marker("write report", MARKER), "➡️ write report");
/// ```
pub fn insert_marker(content: &str, marker: &str) -> String {
    let split = status_prefix_len(content).unwrap_or(0);
    let (prefix, rest) = content.split_at(split);
    format!("{prefix}{marker} {rest}")
}

/// Migrations still allowed after one more, or `None` if the cap is reached
pub fn remaining_after(existing: usize, max: usize) -> Option<usize> {
    (existing < max).then(|| max - existing - 1)
}
