//! Configuration loading functionality.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::ConfigError;

use super::types::PayrollConfig;

/// Loads [`PayrollConfig`] from YAML files.
///
/// A minimal configuration file looks like:
///
/// ```text
/// storage:
///   path: /var/lib/payroll/payroll.db
///   busy_timeout_ms: 2000
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads configuration from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns the parsed configuration, or an error if:
    /// - The file does not exist or cannot be read
    /// - The file contains invalid YAML or unknown value types
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let config = ConfigLoader::load("./payroll.yaml")?;
    /// assert!(config.storage.create_if_missing);
    /// # Ok::<(), payroll_engine::error::ConfigError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<PayrollConfig, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ConfigError::NotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path_str.clone(),
            message,
        })?;

        debug!(path = %path_str, database = %config.storage.path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parses configuration from YAML text. An empty document yields the
    /// defaults.
    pub fn parse_str(content: &str) -> Result<PayrollConfig, ConfigError> {
        Self::parse(content).map_err(|message| ConfigError::Parse {
            path: "<inline>".to_string(),
            message,
        })
    }

    fn parse(content: &str) -> Result<PayrollConfig, String> {
        if content.trim().is_empty() {
            return Ok(PayrollConfig::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }
}
