//! Configuration constants and defaults for matrix-lock.

use crate::lock::{DEFAULT_MAX_DELAY, DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY};
use std::path::PathBuf;

/// Config file looked up in the workspace when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = ".matrix-lock.yaml";

/// Artifact name the lock document is stored under.
pub const DEFAULT_LOCK_NAME: &str = "matrix-lock";

/// File name of the lock document inside each artifact.
pub const DEFAULT_FILE_NAME: &str = "matrix-lock-17c3b450-53fd-4b8d-8df8-6b5af88022dc.lock";

/// Artifact store location, relative to the workspace.
pub const DEFAULT_STORE_DIR: &str = ".matrix-lock/artifacts";

// Default value functions for serde
pub(crate) fn default_lock_name() -> String {
    DEFAULT_LOCK_NAME.to_string()
}
pub(crate) fn default_file_name() -> String {
    DEFAULT_FILE_NAME.to_string()
}
pub(crate) fn default_store_dir() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_DIR)
}
pub(crate) fn default_retry_count() -> u32 {
    DEFAULT_RETRY_COUNT
}
pub(crate) fn default_retry_delay_secs() -> u64 {
    DEFAULT_RETRY_DELAY.as_secs()
}
pub(crate) fn default_max_delay_secs() -> u64 {
    DEFAULT_MAX_DELAY.as_secs()
}
