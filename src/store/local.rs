//! Filesystem-backed artifact service.
//!
//! Artifacts live under a root directory shared by every job, one directory
//! per upload:
//!
//! ```text
//! <root>/<id>/manifest.json
//! <root>/<id>/files/<relative path>...
//! ```
//!
//! Ids are claimed with an exclusive `create_dir`, so two jobs uploading at
//! the same moment always get distinct ids. The manifest is written last and
//! atomically; an upload without a manifest is invisible to readers. The
//! highest id carrying a given name is that name's latest version.

use super::artifact::{ArtifactClient, ArtifactId, ArtifactInfo};
use super::StoreError;
use crate::fs::{atomic_write, copy_file};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MANIFEST_FILE: &str = "manifest.json";
const FILES_DIR: &str = "files";

/// How many consecutive ids an upload may find taken before giving up.
const MAX_ID_CLAIMS: u32 = 64;

/// Metadata stored alongside each uploaded artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Manifest {
    id: ArtifactId,
    name: String,
    created_at: DateTime<Utc>,
    /// `user@host` of the uploading job.
    uploaded_by: String,
    /// File paths relative to the upload root.
    files: Vec<PathBuf>,
    /// Files were pruned by retention; the manifest remains as a tombstone.
    #[serde(default)]
    expired: bool,
}

/// Artifact service rooted at a local (or network-mounted) directory.
#[derive(Debug, Clone)]
pub struct LocalArtifactClient {
    root: PathBuf,
    retain_versions: usize,
}

impl LocalArtifactClient {
    /// Create a client that keeps every uploaded version.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            retain_versions: 0,
        }
    }

    /// Keep only the newest `retain_versions` uploads per name (0 keeps all).
    pub fn with_retention(mut self, retain_versions: usize) -> Self {
        self.retain_versions = retain_versions;
        self
    }

    fn artifact_dir(&self, id: ArtifactId) -> PathBuf {
        self.root.join(id.to_string())
    }

    /// Ids of every artifact directory, complete or not.
    fn artifact_ids(&self) -> Result<Vec<ArtifactId>, StoreError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if let Some(id) = entry
                .file_name()
                .to_str()
                .and_then(|name| name.parse::<ArtifactId>().ok())
            {
                ids.push(id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn read_manifest(&self, id: ArtifactId) -> Result<Option<Manifest>, StoreError> {
        let path = self.artifact_dir(id).join(MANIFEST_FILE);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content).map(Some).map_err(|e| {
            StoreError::Io(format!(
                "failed to parse manifest '{}': {}",
                path.display(),
                e
            ))
        })
    }

    fn write_manifest(&self, manifest: &Manifest) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(manifest)
            .map_err(|e| StoreError::Io(format!("failed to serialize manifest: {}", e)))?;
        atomic_write(
            self.artifact_dir(manifest.id).join(MANIFEST_FILE),
            json.as_bytes(),
        )?;
        Ok(())
    }

    /// Complete manifests for `name`, newest first.
    fn manifests_named(&self, name: &str) -> Result<Vec<Manifest>, StoreError> {
        let mut manifests = Vec::new();
        for id in self.artifact_ids()?.into_iter().rev() {
            match self.read_manifest(id) {
                Ok(Some(manifest)) if manifest.name == name => manifests.push(manifest),
                Ok(_) => {}
                Err(e) => tracing::warn!(artifact = %id, "skipping unreadable artifact: {}", e),
            }
        }
        Ok(manifests)
    }

    /// Newest unexpired manifest for `name`; artifacts older than the match are not read.
    fn latest_live(&self, name: &str) -> Result<Option<Manifest>, StoreError> {
        for id in self.artifact_ids()?.into_iter().rev() {
            match self.read_manifest(id) {
                Ok(Some(manifest)) if manifest.name == name && !manifest.expired => {
                    return Ok(Some(manifest));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(artifact = %id, "skipping unreadable artifact: {}", e),
            }
        }
        Ok(None)
    }

    /// Claim a fresh artifact directory.
    fn claim_next_id(&self) -> Result<(ArtifactId, PathBuf), StoreError> {
        fs::create_dir_all(&self.root)?;

        let mut next = self.artifact_ids()?.last().map_or(1, |id| id.0 + 1);
        for _ in 0..MAX_ID_CLAIMS {
            let id = ArtifactId(next);
            let dir = self.artifact_dir(id);
            match fs::create_dir(&dir) {
                Ok(()) => return Ok((id, dir)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => next += 1,
                Err(e) => return Err(e.into()),
            }
        }

        Err(StoreError::Io(format!(
            "could not allocate an artifact id under '{}'",
            self.root.display()
        )))
    }

    /// Tombstone every version of `name` beyond the retention limit.
    fn prune(&self, name: &str) -> Result<(), StoreError> {
        if self.retain_versions == 0 {
            return Ok(());
        }

        let live = self
            .manifests_named(name)?
            .into_iter()
            .filter(|m| !m.expired)
            .skip(self.retain_versions);

        for mut manifest in live {
            let files_dir = self.artifact_dir(manifest.id).join(FILES_DIR);
            match fs::remove_dir_all(&files_dir) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            manifest.expired = true;
            self.write_manifest(&manifest)?;
            tracing::debug!(artifact = %manifest.id, name, "pruned artifact");
        }

        Ok(())
    }
}

impl ArtifactClient for LocalArtifactClient {
    fn upload(
        &self,
        name: &str,
        files: &[PathBuf],
        root_dir: &Path,
    ) -> Result<ArtifactId, StoreError> {
        let mut relative = Vec::with_capacity(files.len());
        for file in files {
            let rel = file
                .strip_prefix(root_dir)
                .ok()
                .filter(|rel| !rel.as_os_str().is_empty())
                .ok_or_else(|| {
                    StoreError::Io(format!(
                        "'{}' is not under upload root '{}'",
                        file.display(),
                        root_dir.display()
                    ))
                })?;
            relative.push(rel.to_path_buf());
        }

        let (id, dir) = self.claim_next_id()?;
        for (file, rel) in files.iter().zip(&relative) {
            copy_file(file, &dir.join(FILES_DIR).join(rel))?;
        }

        self.write_manifest(&Manifest {
            id,
            name: name.to_string(),
            created_at: Utc::now(),
            uploaded_by: uploader(),
            files: relative,
            expired: false,
        })?;

        if let Err(e) = self.prune(name) {
            tracing::warn!(name, "failed to prune old artifacts: {}", e);
        }

        Ok(id)
    }

    fn get_artifact(&self, name: &str) -> Result<ArtifactInfo, StoreError> {
        self.latest_live(name)?
            .map(|m| ArtifactInfo {
                id: m.id,
                name: m.name,
                created_at: m.created_at,
            })
            .ok_or_else(|| StoreError::NotFound(format!("artifact '{}'", name)))
    }

    fn download(&self, id: ArtifactId, destination: &Path) -> Result<(), StoreError> {
        let manifest = self
            .read_manifest(id)?
            .ok_or_else(|| StoreError::NotFound(format!("artifact {}", id)))?;
        if manifest.expired {
            return Err(StoreError::Expired(id.to_string()));
        }

        let files_dir = self.artifact_dir(id).join(FILES_DIR);
        for rel in &manifest.files {
            copy_file(&files_dir.join(rel), &destination.join(rel)).map_err(|e| {
                // Retention removed the files between reading the manifest and copying.
                if e.kind() == io::ErrorKind::NotFound {
                    StoreError::Expired(id.to_string())
                } else {
                    e.into()
                }
            })?;
        }

        Ok(())
    }
}

/// Owner string recorded in manifests, e.g. `runner@build-host`.
fn uploader() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
