//! Error types for sync operations

use thiserror::Error;
use wsjf_domain::DomainError;

/// Errors that can occur while reconciling items
#[derive(Error, Debug)]
pub enum SyncError {
    /// Host document API error
    #[error("Host error: {0}")]
    Host(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Domain rule violated
    #[error(transparent)]
    Domain(#[from] DomainError),
}
