//! Integration tests for configuration loader
//!
//! Loads provider configuration from files and builds providers from it.

use std::fs;

use forgeprops_domain::{ConfigError, EntityType};
use forgeprops_infra::{config, create_provider, ProviderCredentials};
use tempfile::tempdir;

#[test]
fn test_load_config_from_json_file_builds_both_providers() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("forgeprops.json");
    fs::write(
        &path,
        r#"{
            "http": { "timeout_secs": 5, "max_attempts": 2 },
            "github": {
                "endpoint": "https://github.example/api/v3",
                "webhook_url": "https://hooks.example/github",
                "is_org": true
            },
            "gitlab": {
                "webhook_url": "https://hooks.example/gitlab",
                "current_webhook_secret": "s3cret"
            }
        }"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config loads");
    assert_eq!(config.http.timeout_secs, 5);
    assert_eq!(config.http.max_attempts, 2);
    assert!(config.github.as_ref().is_some_and(|github| github.is_org));

    let credentials = ProviderCredentials::new("token");
    let github = create_provider("github", &config, &credentials).expect("github provider");
    let gitlab = create_provider("gitlab", &config, &credentials).expect("gitlab provider");
    assert!(github.supports_entity(EntityType::Artifact));
    assert!(!gitlab.supports_entity(EntityType::Artifact));
}

#[test]
fn test_load_config_from_toml_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("forgeprops.toml");
    fs::write(
        &path,
        r#"
[http]
user_agent = "forgeprops-test"

[gitlab]
endpoint = "https://gitlab.example/api/v4/"
webhook_url = "https://hooks.example/gitlab"
"#,
    )
    .expect("Failed to write config");

    let config = config::load_from_file(Some(path)).expect("config loads");
    assert_eq!(config.http.user_agent, "forgeprops-test");
    assert!(config.github.is_none());
    assert_eq!(config.gitlab.expect("gitlab section").endpoint, "https://gitlab.example/api/v4/");
}

#[test]
fn test_load_config_rejects_gitlab_without_webhook_url() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "gitlab": { "webhook_url": "" } }"#).expect("Failed to write config");

    let err = config::load_from_file(Some(path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(ref msg) if msg.contains("webhook_url")), "got {err:?}");
}

#[test]
fn test_load_config_from_nonexistent_file() {
    let err = config::load_from_file(Some("/nonexistent/path/config.json".into())).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)), "got {err:?}");
}

#[test]
fn test_load_config_with_invalid_format() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "this is": "not valid" "#).expect("Failed to write config");

    match config::load_from_file(Some(path)) {
        Err(ConfigError::Invalid(msg)) => {
            assert!(msg.contains("Invalid JSON"), "Error message should mention invalid JSON");
        }
        other => panic!("Expected Invalid error, got {other:?}"),
    }
}
