//! Error types for matrix-lock.
//!
//! Uses thiserror for derive macros. Every variant maps to a distinct exit
//! code so the invoking CI step can tell a timeout from a broken store.

use crate::exit_codes;
use crate::queue::DecodeError;
use crate::store::StoreError;
use thiserror::Error;

/// Main error type for lock operations.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum LockError {
    /// A required input or configuration value is missing or invalid.
    #[error("{0}")]
    ConfigError(String),

    /// The lock document could not be resolved or downloaded.
    #[error("failed to read lock '{name}': {source}")]
    StoreReadError {
        name: String,
        #[source]
        source: StoreError,
    },

    /// The lock document could not be uploaded.
    #[error("failed to write lock '{name}': {source}")]
    StoreWriteError {
        name: String,
        #[source]
        source: StoreError,
    },

    /// The persisted lock document is not a valid queue.
    #[error("lock document is corrupt: {0}")]
    DecodeError(#[from] DecodeError),

    /// Every attempt ran without this participant reaching the head of the queue.
    #[error("Max retries ({attempts}) reached. Failed to acquire lock for: {id}")]
    AcquireTimeout { id: String, attempts: u32 },

    /// A release was requested by someone other than the current holder.
    #[error("'{caller}' cannot release lock held by '{holder}'")]
    AuthorizationError { caller: String, holder: String },

    /// The lock document exists but names no holder.
    #[error("lock '{0}' has no holder to release")]
    EmptyQueue(String),
}

impl LockError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LockError::ConfigError(_) | LockError::EmptyQueue(_) => exit_codes::USER_ERROR,
            LockError::StoreReadError { .. } | LockError::StoreWriteError { .. } => {
                exit_codes::STORE_FAILURE
            }
            LockError::DecodeError(_) => exit_codes::DECODE_FAILURE,
            LockError::AcquireTimeout { .. } => exit_codes::LOCK_TIMEOUT,
            LockError::AuthorizationError { .. } => exit_codes::AUTHORIZATION_FAILURE,
        }
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;
