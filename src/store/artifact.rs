//! Artifact-backed lock store.

use super::{Handle, LockStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::TempDir;

/// Prefix of the per-operation staging directories in the workspace.
const STAGING_PREFIX: &str = ".matrix-lock-staging-";

/// Identifier of one uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactId(pub u64);

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ArtifactId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(ArtifactId)
    }
}

/// Description of the latest artifact for a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactInfo {
    pub id: ArtifactId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Client for a CI artifact service.
pub trait ArtifactClient {
    /// Upload `files` (all under `root_dir`) as a new artifact called `name`.
    fn upload(&self, name: &str, files: &[PathBuf], root_dir: &Path)
    -> Result<ArtifactId, StoreError>;

    /// Find the most recent artifact called `name`.
    fn get_artifact(&self, name: &str) -> Result<ArtifactInfo, StoreError>;

    /// Download the files of artifact `id` into `destination`, keeping their
    /// paths relative to the upload root.
    fn download(&self, id: ArtifactId, destination: &Path) -> Result<(), StoreError>;
}

/// [`LockStore`] that moves the lock document through an artifact service.
///
/// Every `put` stages the bytes as `<file_name>` in a private directory under
/// the workspace and uploads it from there; every `fetch` downloads into its
/// own private directory and reads the same file back. Concurrent jobs sharing
/// a workspace never touch each other's staged files.
#[derive(Debug, Clone)]
pub struct ArtifactLockStore<C> {
    client: C,
    workspace: PathBuf,
    file_name: String,
}

impl<C: ArtifactClient> ArtifactLockStore<C> {
    pub fn new(client: C, workspace: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            client,
            workspace: workspace.into(),
            file_name: file_name.into(),
        }
    }

    /// Fresh staging directory, removed when dropped.
    fn staging_dir(&self) -> Result<TempDir, StoreError> {
        tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .tempdir_in(&self.workspace)
            .map_err(|e| {
                StoreError::Io(format!(
                    "failed to create staging directory in '{}': {}",
                    self.workspace.display(),
                    e
                ))
            })
    }
}

impl<C: ArtifactClient> LockStore for ArtifactLockStore<C> {
    fn put(&self, name: &str, content: &[u8]) -> Result<Handle, StoreError> {
        let staging = self.staging_dir()?;
        let path = staging.path().join(&self.file_name);
        fs::write(&path, content)?;
        let id = self.client.upload(name, &[path], staging.path())?;
        Ok(Handle::new(id.to_string()))
    }

    fn resolve(&self, name: &str) -> Result<Handle, StoreError> {
        let info = self.client.get_artifact(name)?;
        tracing::debug!(
            artifact = %info.id,
            created_at = %info.created_at,
            "resolved '{}'",
            info.name
        );
        Ok(Handle::new(info.id.to_string()))
    }

    fn fetch(&self, handle: &Handle) -> Result<Vec<u8>, StoreError> {
        let id: ArtifactId = handle
            .as_str()
            .parse()
            .map_err(|_| StoreError::NotFound(format!("artifact '{}'", handle)))?;

        let staging = self.staging_dir()?;
        self.client.download(id, staging.path())?;

        fs::read(staging.path().join(&self.file_name)).map_err(|e| {
            if e.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound(format!(
                    "artifact {} does not contain '{}'",
                    id, self.file_name
                ))
            } else {
                e.into()
            }
        })
    }
}
