//! WSJF Sync
//!
//! Keeps the derived prioritization properties of outline items consistent
//! with their factor inputs.
//!
//! # Overview
//!
//! The controller is responsible for:
//! - **Single-item reconciliation**: score, background color band, legacy
//!   cleanup, removal of stale derived properties
//! - **Tree passes**: recalculating every item of a page and setting the
//!   fine-grained tier marker
//! - **Migration markers**: counting and inserting the deferral marker in an
//!   item's content
//! - **Metrics collection**: tracking writes and failures
//!
//! Every entry point is best-effort. Failures are logged with `tracing`,
//! reported to the user through the host where the operation is user-facing,
//! and swallowed; the returned outcome says what happened.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use wsjf_host::MemoryHost;
//! use wsjf_sync::{SyncConfig, SyncController, TreeOutcome};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let host = Arc::new(MemoryHost::from_json_file("outline.json")?);
//! let controller = SyncController::new(host, SyncConfig::default());
//!
//! if let TreeOutcome::Completed(report) = controller.reconcile_tree("backlog").await {
//!     println!("{} blocks updated", report.updated);
//! }
//! println!("{}", controller.metrics().summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! settle_delay_ms = 500
//! change_debounce_ms = 300
//! max_migrations = 3
//! dry_run = false
//!
//! [bands]
//! red = 10.0
//! green = 4.0
//! blue = 1.5
//! ```

#![warn(missing_docs)]

mod config;
mod controller;
mod error;
mod metrics;
mod outcome;
mod watcher;

pub use config::SyncConfig;
pub use controller::{Evaluation, SyncController};
pub use error::SyncError;
pub use metrics::SyncMetrics;
pub use outcome::{ItemOutcome, MigrationOutcome, TreeOutcome, TreeReport};
pub use watcher::{ChangeWatcher, WatchReport};
