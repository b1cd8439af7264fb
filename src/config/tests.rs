//! Tests for config functionality.

use crate::config::{Config, DEFAULT_FILE_NAME, DEFAULT_LOCK_NAME};
use crate::lock::Backoff;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.lock_name, DEFAULT_LOCK_NAME);
    assert_eq!(config.file_name, DEFAULT_FILE_NAME);
    assert_eq!(config.store_dir, PathBuf::from(".matrix-lock/artifacts"));
    assert_eq!(config.retain_versions, 0);
    assert_eq!(config.retry_count, 6);
    assert_eq!(config.retry_delay_secs, 10);
    assert_eq!(config.backoff, Backoff::Fixed);
    assert_eq!(config.max_delay_secs, 300);
}

#[test]
fn test_parse_empty_yaml() {
    let config = Config::from_yaml("").unwrap();

    assert_eq!(config.lock_name, DEFAULT_LOCK_NAME);
    assert_eq!(config.retry_count, 6);
}

#[test]
fn test_parse_partial_yaml() {
    let yaml = r#"
lock_name: deploy-lock
retry_count: 30
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_name, "deploy-lock");
    assert_eq!(config.retry_count, 30);

    // Unspecified values should use defaults
    assert_eq!(config.retry_delay_secs, 10);
    assert_eq!(config.file_name, DEFAULT_FILE_NAME);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
lock_name: release
file_name: release.lock
store_dir: /mnt/shared/artifacts
retain_versions: 5
retry_count: 12
retry_delay_secs: 15
backoff: exponential
max_delay_secs: 120
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_name, "release");
    assert_eq!(config.file_name, "release.lock");
    assert_eq!(config.store_dir, PathBuf::from("/mnt/shared/artifacts"));
    assert_eq!(config.retain_versions, 5);
    assert_eq!(config.retry_count, 12);
    assert_eq!(config.retry_delay_secs, 15);
    assert_eq!(config.backoff, Backoff::Exponential);
    assert_eq!(config.max_delay_secs, 120);
}

#[test]
fn test_unknown_fields_are_ignored() {
    let config = Config::from_yaml("future_option: true\nretry_count: 2\n").unwrap();
    assert_eq!(config.retry_count, 2);
}

#[test]
fn test_invalid_yaml_is_config_error() {
    let err = Config::from_yaml("retry_count: [not a number").unwrap_err();
    assert!(err.to_string().contains("failed to parse config YAML"));
}

#[test]
fn test_validate_rejects_zero_retry_count() {
    let err = Config::from_yaml("retry_count: 0").unwrap_err();
    assert!(err.to_string().contains("retry_count must be greater than 0"));
}

#[test]
fn test_validate_rejects_empty_names() {
    assert!(Config::from_yaml("lock_name: ''").is_err());
    assert!(Config::from_yaml("file_name: ''").is_err());
}

#[test]
fn test_validate_rejects_file_name_with_separator() {
    let err = Config::from_yaml("file_name: nested/lock.txt").unwrap_err();
    assert!(err.to_string().contains("plain file name"));
    assert!(Config::from_yaml("file_name: '..'").is_err());
}

#[test]
fn test_validate_exponential_needs_room_to_grow() {
    let yaml = "backoff: exponential\nretry_delay_secs: 60\nmax_delay_secs: 30\n";
    let err = Config::from_yaml(yaml).unwrap_err();
    assert!(err.to_string().contains("max_delay_secs"));

    // The same values are fine for a fixed delay.
    assert!(Config::from_yaml("retry_delay_secs: 60\nmax_delay_secs: 30\n").is_ok());
}

#[test]
fn test_retry_policy_from_config() {
    let config = Config::from_yaml("retry_count: 3\nretry_delay_secs: 4\nbackoff: exponential\n")
        .unwrap();
    let policy = config.retry_policy();

    assert_eq!(policy.attempts, 3);
    assert_eq!(policy.delay, Duration::from_secs(4));
    assert_eq!(policy.delay_after(2), Duration::from_secs(8));
}

#[test]
fn test_store_root_resolution() {
    let workspace = Path::new("/work");
    let config = Config::default();
    assert_eq!(
        config.store_root(workspace),
        PathBuf::from("/work/.matrix-lock/artifacts")
    );

    let config = Config {
        store_dir: PathBuf::from("/shared/store"),
        ..Config::default()
    };
    assert_eq!(config.store_root(workspace), PathBuf::from("/shared/store"));
}

#[test]
fn test_load_or_default_without_file() {
    let temp_dir = TempDir::new().unwrap();

    let config = Config::load_or_default(temp_dir.path().join("missing.yaml")).unwrap();
    assert_eq!(config.retry_count, 6);
}

#[test]
fn test_load_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");
    std::fs::write(&path, "retry_delay_secs: 1\n").unwrap();

    let config = Config::load_or_default(&path).unwrap();
    assert_eq!(config.retry_delay_secs, 1);
}

#[test]
fn test_load_missing_file_is_error() {
    let temp_dir = TempDir::new().unwrap();

    let err = Config::load(temp_dir.path().join("missing.yaml")).unwrap_err();
    assert!(err.to_string().contains("failed to read config file"));
}
