//! Domain error types

use thiserror::Error;

/// Errors raised while building or parsing domain values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Item identifier is not a valid UUID
    #[error("Invalid item id: {0}")]
    InvalidItemId(String),

    /// Unknown factor name
    #[error("Unknown factor: {0}")]
    UnknownFactor(String),

    /// Threshold list is empty or not strictly descending
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Factor scale has no options or a non-positive value
    #[error("Invalid scale: {0}")]
    InvalidScale(String),
}
