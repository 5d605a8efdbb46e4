// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty paths and sane upload limits.

use crate::diagnostic::ConfigError;
use crate::model::ReclaimConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ReclaimConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.service.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "service.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.service.log_level
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.files.root_dir.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "files.root_dir must not be empty".to_string(),
        });
    }

    if config.files.public_base_url.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "files.public_base_url must not be empty".to_string(),
        });
    }

    if config.auth.password_min_length < 4 {
        errors.push(ConfigError::Validation {
            message: format!(
                "auth.password_min_length must be at least 4, got {}",
                config.auth.password_min_length
            ),
        });
    }

    if config.uploads.max_bytes == 0 {
        errors.push(ConfigError::Validation {
            message: "uploads.max_bytes must be greater than zero".to_string(),
        });
    }

    if config.uploads.allowed_extensions.is_empty() {
        errors.push(ConfigError::Validation {
            message: "uploads.allowed_extensions must not be empty".to_string(),
        });
    }

    for ext in &config.uploads.allowed_extensions {
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()) {
            errors.push(ConfigError::Validation {
                message: format!(
                    "uploads.allowed_extensions entries must be lowercase alphanumeric, got `{ext}`"
                ),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ReclaimConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let mut config = ReclaimConfig::default();
        config.service.log_level = "verbose".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("log_level"));
    }

    #[test]
    fn all_errors_are_collected_not_fail_fast() {
        let mut config = ReclaimConfig::default();
        config.storage.database_path = " ".to_string();
        config.uploads.max_bytes = 0;
        config.auth.password_min_length = 1;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn config_parsed_from_toml_validates() {
        let toml_str = r#"
            [service]
            log_level = "debug"

            [uploads]
            max_bytes = 1048576
            allowed_extensions = ["png", "webp"]
        "#;
        let config: ReclaimConfig = toml::from_str(toml_str).unwrap();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.uploads.max_bytes, 1048576);
    }

    #[test]
    fn uppercase_extension_is_rejected() {
        let mut config = ReclaimConfig::default();
        config.uploads.allowed_extensions = vec!["JPG".to_string()];
        assert!(validate_config(&config).is_err());
    }
}
