//! Config loading, validation, and derived values.

use super::model::Config;
use crate::error::{LockError, Result};
use crate::lock::{Backoff, RetryPolicy};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when the file
    /// does not exist. A file that exists but is invalid is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::metadata(path) {
            Ok(_) => Self::load(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(LockError::ConfigError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))),
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).map_err(|e| {
                LockError::ConfigError(format!("failed to parse config YAML: {}", e))
            })?
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_name` and `file_name` must be non-empty
    /// - `file_name` must be a bare file name (no path separators)
    /// - `retry_count` must be positive
    /// - with exponential backoff, `max_delay_secs` must be at least `retry_delay_secs`
    pub fn validate(&self) -> Result<()> {
        if self.lock_name.trim().is_empty() {
            return Err(LockError::ConfigError(
                "config validation failed: lock_name must not be empty".to_string(),
            ));
        }

        if self.file_name.trim().is_empty() {
            return Err(LockError::ConfigError(
                "config validation failed: file_name must not be empty".to_string(),
            ));
        }

        if self.file_name.contains(['/', '\\']) || self.file_name == "." || self.file_name == ".."
        {
            return Err(LockError::ConfigError(format!(
                "config validation failed: file_name must be a plain file name (found '{}')",
                self.file_name
            )));
        }

        if self.retry_count == 0 {
            return Err(LockError::ConfigError(
                "config validation failed: retry_count must be greater than 0".to_string(),
            ));
        }

        if self.backoff == Backoff::Exponential && self.max_delay_secs < self.retry_delay_secs {
            return Err(LockError::ConfigError(format!(
                "config validation failed: max_delay_secs ({}) must be at least retry_delay_secs ({})",
                self.max_delay_secs, self.retry_delay_secs
            )));
        }

        Ok(())
    }

    /// Build the acquire retry policy from these settings.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_count, Duration::from_secs(self.retry_delay_secs))
            .with_backoff(self.backoff, Duration::from_secs(self.max_delay_secs))
    }

    /// Absolute artifact store directory for the given workspace.
    pub fn store_root(&self, workspace: &Path) -> PathBuf {
        if self.store_dir.is_absolute() {
            self.store_dir.clone()
        } else {
            workspace.join(&self.store_dir)
        }
    }
}
