//! Lock store adapters.
//!
//! A [`LockStore`] is a thin view over a versioned blob store: `put` a named
//! blob, `resolve` a name to its latest version, `fetch` the bytes of one
//! version. There is no compare-and-swap and no retry logic at this layer;
//! the protocol engine decides what a failure means.
//!
//! The production adapter is [`ArtifactLockStore`], which speaks to an
//! [`ArtifactClient`] the same way a CI job would: stage the lock file in
//! the workspace, upload it, and later download it back.

mod artifact;
mod local;

pub use artifact::{ArtifactClient, ArtifactId, ArtifactInfo, ArtifactLockStore};
pub use local::LocalArtifactClient;

// Test support - only compiled for tests
#[cfg(test)]
mod memory;
#[cfg(test)]
pub use memory::{MemoryStore, StoreCall};

use std::fmt;
use thiserror::Error;

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No blob is associated with the name or handle.
    #[error("not found: {0}")]
    NotFound(String),

    /// The version existed but is no longer retrievable.
    #[error("version {0} has expired")]
    Expired(String),

    /// The backing store failed.
    #[error("{0}")]
    Io(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

/// Opaque reference to one written version of a blob.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle(String);

impl Handle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named, versioned blob storage used to hold the lock document.
pub trait LockStore {
    /// Store `content` under `name` and return a handle to the new version.
    fn put(&self, name: &str, content: &[u8]) -> Result<Handle, StoreError>;

    /// Return a handle to the latest version stored under `name`.
    fn resolve(&self, name: &str) -> Result<Handle, StoreError>;

    /// Return the exact bytes written for `handle`.
    fn fetch(&self, handle: &Handle) -> Result<Vec<u8>, StoreError>;
}

impl<S: LockStore + ?Sized> LockStore for &S {
    fn put(&self, name: &str, content: &[u8]) -> Result<Handle, StoreError> {
        (**self).put(name, content)
    }

    fn resolve(&self, name: &str) -> Result<Handle, StoreError> {
        (**self).resolve(name)
    }

    fn fetch(&self, handle: &Handle) -> Result<Vec<u8>, StoreError> {
        (**self).fetch(handle)
    }
}
