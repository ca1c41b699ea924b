//! Integration tests for configuration loader
//!
//! Tests the end-to-end behavior of loading configuration from files.

use std::io::Write;

use deviceplat_domain::DevicePlatError;
use deviceplat_infra::config;
use tempfile::NamedTempFile;

fn config_file(suffix: &str, contents: &str) -> NamedTempFile {
    let mut temp_file = tempfile::Builder::new()
        .prefix("deviceplat-config")
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    temp_file.write_all(contents.as_bytes()).expect("Failed to write to temp file");
    temp_file
}

#[test]
fn test_load_config_from_json_file() {
    let json_content = r#"{
        "api": {
            "base_url": "https://api.integration.test",
            "timeout_ms": 10000,
            "max_retries": 2,
            "headers": {"X-App": "integration"},
            "retry": {"base_delay_ms": 200, "max_jitter_ms": 50, "max_delay_ms": 2000}
        },
        "auth": {
            "auth_base_url": "https://login.integration.test",
            "client_id": "integration-client",
            "audience": "https://api.integration.test",
            "scopes": ["openid", "offline_access"],
            "redirect_uri": "http://localhost:8765/callback"
        }
    }"#;

    let file = config_file(".json", json_content);
    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from JSON file");

    assert_eq!(config.api.base_url, "https://api.integration.test");
    assert_eq!(config.api.timeout_ms, 10_000);
    assert_eq!(config.api.max_retries, 2);
    assert_eq!(config.api.headers.get("X-App").map(String::as_str), Some("integration"));
    assert_eq!(config.api.retry.max_delay_ms, 2_000);

    assert_eq!(config.auth.client_id, "integration-client");
    assert_eq!(config.auth.scopes, vec!["openid", "offline_access"]);
    assert_eq!(config.auth.redirect_uri.as_deref(), Some("http://localhost:8765/callback"));
    assert_eq!(config.auth.token_url(), "https://login.integration.test/oauth/token");
}

#[test]
fn test_load_config_from_toml_file() {
    let toml_content = r#"
[api]
base_url = "https://api.integration.test"
max_retries = 0

[auth]
client_id = "toml-client"
timeout_ms = 5000
"#;

    let file = config_file(".toml", toml_content);
    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config from TOML file");

    assert_eq!(config.api.base_url, "https://api.integration.test");
    assert_eq!(config.api.max_retries, 0);
    assert_eq!(config.auth.client_id, "toml-client");
    assert_eq!(config.auth.timeout_ms, 5_000);
}

#[test]
fn test_load_config_with_minimal_fields() {
    let file = config_file(".json", r#"{"auth": {"client_id": "minimal"}}"#);
    let config = config::load_from_file(Some(file.path().to_path_buf()))
        .expect("Failed to load config with minimal fields");

    assert_eq!(config.auth.client_id, "minimal");
    assert_eq!(config.api.timeout_ms, 30_000);
    assert_eq!(config.api.max_retries, 3);
    assert_eq!(config.auth.redirect_uri, None);
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let result = config::load_from_file(Some("/nonexistent/path/config.json".into()));

    match result {
        Err(DevicePlatError::Config(msg)) => {
            assert!(msg.contains("not found"), "Error message should mention 'not found'");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_load_config_with_invalid_format() {
    let file = config_file(".json", r#"{ "this is": "not valid" "#);
    let result = config::load_from_file(Some(file.path().to_path_buf()));

    match result {
        Err(DevicePlatError::Config(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Config error, got {other:?}"),
    }
}
