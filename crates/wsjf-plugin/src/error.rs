//! Error types for the interaction surface.

use thiserror::Error;
use wsjf_domain::traits::{Action, MessageLevel};

/// Interaction error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// No item under the cursor
    #[error("No current item")]
    NoCurrentItem,

    /// A factor was left unselected or zero
    #[error("Incomplete form submission")]
    IncompleteForm,

    /// Submit or cancel with no form open
    #[error("No prioritization form is open")]
    NoOpenForm,

    /// Item-scoped action dispatched without an item
    #[error("Action {0:?} requires a target item")]
    MissingTarget(Action),

    /// Host API error
    #[error("Host error: {0}")]
    Host(String),
}

impl PluginError {
    /// Message shown to the user for this error
    pub fn user_message(&self) -> (&'static str, MessageLevel) {
        match self {
            PluginError::NoCurrentItem => {
                ("Please place cursor in a block first", MessageLevel::Warning)
            }
            PluginError::IncompleteForm => ("Please fill all fields", MessageLevel::Warning),
            PluginError::NoOpenForm => ("No prioritization form is open", MessageLevel::Warning),
            PluginError::MissingTarget(_) => ("Please select a block first", MessageLevel::Warning),
            PluginError::Host(_) => ("WSJF action failed", MessageLevel::Error),
        }
    }
}
