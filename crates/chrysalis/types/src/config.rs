use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// Every field has a default so partial configuration files deserialise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChrysalisConfig {
    /// Upper bound on generated domain size, ground candidate included.
    pub max_domain_size: usize,
    /// Number of distinct recent candidates kept as experience for vocabulary
    /// extraction.
    pub history_window: usize,
    /// Highest depth marker tried by the perturbator before giving up.
    pub max_perturbation_depth: u32,
    /// Default persisted record location.
    pub state_path: Option<PathBuf>,
}

impl Default for ChrysalisConfig {
    fn default() -> Self {
        Self {
            max_domain_size: 256,
            history_window: 64,
            max_perturbation_depth: 8,
            state_path: None,
        }
    }
}

impl ChrysalisConfig {
    /// Small caps, handy for demos and tests.
    pub fn minimal() -> Self {
        Self {
            max_domain_size: 16,
            history_window: 4,
            max_perturbation_depth: 3,
            state_path: None,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_domain_size == 0 {
            return Err(ConfigError::ZeroDomainCap);
        }
        if self.history_window == 0 {
            return Err(ConfigError::ZeroHistoryWindow);
        }
        Ok(())
    }
}

/// Invalid configuration values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max_domain_size must be at least 1")]
    ZeroDomainCap,
    #[error("history_window must be at least 1")]
    ZeroHistoryWindow,
}
