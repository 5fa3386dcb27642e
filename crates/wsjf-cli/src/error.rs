//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Sync configuration rejected
    #[error(transparent)]
    Sync(#[from] wsjf_sync::SyncError),

    /// Snapshot could not be loaded or saved
    #[error("Snapshot error: {0}")]
    Host(#[from] wsjf_host::HostError),

    /// Domain value rejected
    #[error(transparent)]
    Domain(#[from] wsjf_domain::DomainError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Operation ran but did not complete
    #[error("{0}")]
    Failed(String),
}
