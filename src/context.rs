//! Invocation context resolution for matrix-lock.
//!
//! Every command runs against a workspace: the base working directory shared
//! with the artifact store (`GITHUB_WORKSPACE` on CI). This module resolves
//! the workspace, loads configuration, applies command-line overrides, and
//! builds the lock over the configured store.

use crate::config::{CONFIG_FILE_NAME, Config};
use crate::error::{LockError, Result};
use crate::lock::MatrixLock;
use crate::store::{ArtifactLockStore, LocalArtifactClient};
use std::path::{Path, PathBuf};

/// Lock store used by the CLI.
pub type WorkspaceStore = ArtifactLockStore<LocalArtifactClient>;

/// Resolved settings for one invocation. All paths are absolute.
#[derive(Debug, Clone)]
pub struct LockContext {
    /// Base working directory; each store operation stages its files here.
    pub workspace: PathBuf,

    /// Effective configuration, overrides applied.
    pub config: Config,
}

impl LockContext {
    /// Resolve the context for an invocation.
    ///
    /// # Arguments
    ///
    /// * `workspace` - Base working directory, if one was provided
    /// * `config_path` - Explicit config file; defaults to `<workspace>/.matrix-lock.yaml`
    /// * `lock_name` - Overrides the configured lock name
    ///
    /// # Returns
    ///
    /// * `Ok(LockContext)` - Successfully resolved context
    /// * `Err(LockError::ConfigError)` - Missing workspace or invalid config (exit code 1)
    pub fn resolve(
        workspace: Option<&Path>,
        config_path: Option<&Path>,
        lock_name: Option<&str>,
    ) -> Result<Self> {
        let workspace = workspace.ok_or_else(|| {
            LockError::ConfigError(
                "GITHUB_WORKSPACE environment variable is not set (or pass --workspace)"
                    .to_string(),
            )
        })?;

        if !workspace.is_dir() {
            return Err(LockError::ConfigError(format!(
                "workspace '{}' is not a directory",
                workspace.display()
            )));
        }

        let workspace = std::path::absolute(workspace).map_err(|e| {
            LockError::ConfigError(format!(
                "failed to resolve workspace '{}': {}",
                workspace.display(),
                e
            ))
        })?;

        let mut config = match config_path {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(workspace.join(CONFIG_FILE_NAME))?,
        };

        if let Some(name) = lock_name {
            config.lock_name = name.trim().to_string();
            config.validate()?;
        }

        Ok(Self { workspace, config })
    }

    /// Build a context directly from values, without touching the filesystem.
    pub fn new(workspace: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            workspace: workspace.into(),
            config,
        }
    }

    pub fn lock_name(&self) -> &str {
        &self.config.lock_name
    }

    /// Absolute path of the shared artifact store.
    pub fn store_root(&self) -> PathBuf {
        self.config.store_root(&self.workspace)
    }

    /// Open the artifact-backed store for this workspace.
    pub fn open_store(&self) -> WorkspaceStore {
        let client = LocalArtifactClient::new(self.store_root())
            .with_retention(self.config.retain_versions);
        ArtifactLockStore::new(client, &self.workspace, &self.config.file_name)
    }

    /// Open the configured lock over the workspace store.
    pub fn open_lock(&self) -> MatrixLock<WorkspaceStore> {
        MatrixLock::new(self.open_store(), self.lock_name())
    }
}
