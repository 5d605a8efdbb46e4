// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Reclaim configuration system.

use reclaim_config::diagnostic::ConfigError;
use reclaim_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_reclaim_config() {
    let toml = r#"
[service]
name = "reclaim-test"
log_level = "debug"

[storage]
database_path = "/tmp/reclaim-test.db"
wal_mode = false

[files]
root_dir = "/tmp/reclaim-objects"
public_base_url = "https://cdn.example.edu/storage"

[auth]
password_min_length = 8
session_file = "/tmp/reclaim-session"

[uploads]
max_bytes = 1048576
allowed_extensions = ["png", "webp"]
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.service.name, "reclaim-test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/reclaim-test.db");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.files.root_dir, "/tmp/reclaim-objects");
    assert_eq!(config.files.public_base_url, "https://cdn.example.edu/storage");
    assert_eq!(config.auth.password_min_length, 8);
    assert_eq!(config.uploads.max_bytes, 1_048_576);
    assert_eq!(config.uploads.allowed_extensions, vec!["png", "webp"]);
}

/// Empty TOML falls back to compiled defaults.
#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("defaults should apply");
    assert_eq!(config.service.name, "reclaim");
    assert_eq!(config.service.log_level, "info");
    assert!(config.storage.wal_mode);
    assert_eq!(config.auth.password_min_length, 6);
    assert_eq!(config.uploads.max_bytes, 5 * 1024 * 1024);
    assert!(config.uploads.allowed_extensions.contains(&"jpeg".to_string()));
}

/// Unknown field in [storage] produces an UnknownKey error with a suggestion.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[storage]
databse_path = "/tmp/x.db"
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(!errors.is_empty());
    match &errors[0] {
        ConfigError::UnknownKey { key, suggestion, .. } => {
            assert_eq!(key, "databse_path");
            assert_eq!(suggestion.as_deref(), Some("database_path"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// A wrong-typed value produces an InvalidType error.
#[test]
fn wrong_type_produces_invalid_type_error() {
    let toml = r#"
[uploads]
max_bytes = "lots"
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "expected an InvalidType error, got {errors:?}");
}

/// Semantic validation rejects out-of-range values after deserialization.
#[test]
fn semantic_validation_rejects_zero_upload_cap() {
    let toml = r#"
[uploads]
max_bytes = 0
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("max_bytes")));
}
