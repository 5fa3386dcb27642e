//! WSJF Plugin
//!
//! Interaction surface of the prioritization plugin: the entry points a user
//! can trigger inside the host, and the form used to score a single item.
//!
//! # Entry points
//!
//! | Entry point | Kind | Action |
//! |-------------|------|--------|
//! | `WSJF: Prioritize` | slash command | open the form for the item under the cursor |
//! | `Calculate WSJF` | slash command | recalculate the open page |
//! | `Prioritisation for this block` | context menu | open the form for the clicked item |
//! | `Mark as Migrated` | context menu | add a migration marker |
//! | `wsjf-calculator` | toolbar | recalculate the open page |
//!
//! Every action is best-effort: failures are logged and reported to the user
//! through the host, never propagated to the caller.

#![warn(missing_docs)]

mod error;
pub mod form;
mod plugin;

pub use error::PluginError;
pub use form::{FormField, FormSubmission, PrioritizationForm};
pub use plugin::{
    DispatchOutcome, WsjfPlugin, CALCULATE_COMMAND, MIGRATE_MENU_ITEM, PRIORITIZE_COMMAND,
    PRIORITIZE_MENU_ITEM, TOOLBAR_KEY,
};
