//! Config struct definition and default implementation.

use super::types::*;
use crate::lock::Backoff;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for matrix-lock.
///
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Lock document
    // =========================================================================
    /// Artifact name holding the queue. Distinct names are distinct locks.
    #[serde(default = "default_lock_name")]
    pub lock_name: String,

    /// File name of the queue inside each uploaded artifact.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    // =========================================================================
    // Artifact store
    // =========================================================================
    /// Directory of the shared artifact store; relative paths are resolved
    /// against the workspace.
    #[serde(default = "default_store_dir")]
    pub store_dir: PathBuf,

    /// Uploads kept per artifact name; older ones expire (0 keeps all).
    #[serde(default)]
    pub retain_versions: usize,

    // =========================================================================
    // Acquire polling
    // =========================================================================
    /// Number of attempts made by `wait`.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Seconds to wait between attempts.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,

    /// How the delay grows between attempts.
    #[serde(default)]
    pub backoff: Backoff,

    /// Upper bound for exponential backoff, in seconds.
    #[serde(default = "default_max_delay_secs")]
    pub max_delay_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_name: default_lock_name(),
            file_name: default_file_name(),
            store_dir: default_store_dir(),
            retain_versions: 0,
            retry_count: default_retry_count(),
            retry_delay_secs: default_retry_delay_secs(),
            backoff: Backoff::default(),
            max_delay_secs: default_max_delay_secs(),
        }
    }
}
