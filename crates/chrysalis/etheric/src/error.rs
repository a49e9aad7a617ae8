//! Error types for the persistence substrate.

use thiserror::Error;

/// Errors raised while reading or writing persisted records.
#[derive(Debug, Error)]
pub enum EthericError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The record exists but cannot be decoded.
    #[error("corrupt record at {location}: {reason}")]
    Corrupt { location: String, reason: String },

    #[error("store lock poisoned")]
    LockError,
}

/// Result type for persistence operations.
pub type EthericResult<T> = Result<T, EthericError>;
