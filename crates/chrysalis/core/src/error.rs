//! Error types for the crystallization engine.

use chrysalis_etheric::EthericError;
use chrysalis_types::ConfigError;
use thiserror::Error;

/// Errors surfaced to callers of the engine.
///
/// Degenerate domains and unusable persisted records are recovered
/// internally and never appear here.
#[derive(Debug, Error)]
pub enum ChrysalisError {
    /// Narrowing eliminated every candidate. Nothing was bound.
    #[error("unsatisfiable: {constraint_count} constraints eliminated all {domain_size} candidates")]
    Unsatisfiable {
        domain_size: usize,
        constraint_count: usize,
    },

    /// A constraint with this name is already registered.
    #[error("duplicate constraint: {0}")]
    DuplicateConstraint(String),

    /// No further distinct compound key can be synthesised.
    #[error("perturbation exhausted: no new compound key from {vocabulary_size} vocabulary keys")]
    PerturbationExhausted { vocabulary_size: usize },

    /// An explicit save or load request failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] EthericError),

    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

/// Result type for engine operations.
pub type ChrysalisResult<T> = Result<T, ChrysalisError>;
