//! CLI configuration

use crate::error::{CliError, CliResult};
use chrysalis_types::ChrysalisConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration
///
/// ```toml
/// log_filter = "info"
///
/// [chrysalis]
/// max_domain_size = 64
/// state_path = "/var/lib/chrysalis/record.json"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Engine settings
    #[serde(default)]
    pub chrysalis: ChrysalisConfig,

    /// Log filter used when RUST_LOG is unset
    pub log_filter: Option<String>,
}

impl CliConfig {
    /// Load configuration from file. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_config_path() {
                Some(p) => p,
                None => return Ok(CliConfig::default()),
            },
        };

        if !config_path.exists() {
            return Ok(CliConfig::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|e| CliError::Config(format!("{}: {}", config_path.display(), e)))?;
        config
            .chrysalis
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Get the default configuration file path
    fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chrysalis").join("config.toml"))
    }
}
