//! Configuration model for matrix-lock.
//!
//! This module defines the Config struct that represents the optional
//! `.matrix-lock.yaml` in the workspace. It supports forward-compatible YAML
//! parsing (unknown fields are ignored), defaults for every field, and
//! validation of config values. Command-line flags override file values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use types::{CONFIG_FILE_NAME, DEFAULT_FILE_NAME, DEFAULT_LOCK_NAME};
