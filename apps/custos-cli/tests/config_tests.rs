//! Integration tests for CLI configuration loading

use std::sync::Mutex;

use custos_cli::config::{Config, ConfigPaths};
use custos_cli::error::CliError;
use tempfile::TempDir;

// Loading consults CUSTOS_* variables; serialize the tests that touch
// the process environment against the ones that read it.
static ENV_LOCK: Mutex<()> = Mutex::new(());

#[test]
fn load_reads_config_json() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "endpoint": "https://admin.example.com", "api_key": "k-123" }"#,
    )
    .unwrap();

    let config = Config::load(&ConfigPaths::in_dir(dir.path())).unwrap();
    assert_eq!(config.endpoint, "https://admin.example.com");
    assert_eq!(config.api_key, "k-123");
    assert_eq!(config.timeout_secs, 30);
}

#[test]
fn load_honours_explicit_timeout() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "endpoint": "https://admin.example.com", "api_key": "k", "timeout_secs": 5 }"#,
    )
    .unwrap();

    let config = Config::load(&ConfigPaths::in_dir(dir.path())).unwrap();
    assert_eq!(config.timeout(), std::time::Duration::from_secs(5));
}

#[test]
fn missing_endpoint_is_a_config_error() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = TempDir::new().unwrap();
    let err = Config::load(&ConfigPaths::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
    assert!(err.suggestion().is_some());
}

#[test]
fn malformed_config_file_is_reported() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.json"), "{ not json").unwrap();

    let err = Config::load(&ConfigPaths::in_dir(dir.path())).unwrap_err();
    assert!(matches!(err, CliError::Config(_)));
}

#[test]
fn environment_overrides_config_file() {
    let _guard = ENV_LOCK.lock().unwrap();
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.json"),
        r#"{ "endpoint": "https://file.example.com", "api_key": "file-key" }"#,
    )
    .unwrap();

    std::env::set_var("CUSTOS_ENDPOINT", "https://env.example.com");
    let config = Config::load(&ConfigPaths::in_dir(dir.path())).unwrap();
    std::env::remove_var("CUSTOS_ENDPOINT");

    assert_eq!(config.endpoint, "https://env.example.com");
    assert_eq!(config.api_key, "file-key");
}
