// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Reclaim service.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Reclaim configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReclaimConfig {
    /// Service identity and logging settings.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Data gateway storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// File-object store settings.
    #[serde(default)]
    pub files: FilesConfig,

    /// Session provider settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Image upload limits.
    #[serde(default)]
    pub uploads: UploadConfig,
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name of the service instance.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "reclaim".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// SQLite data gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Whether to enable WAL journaling mode.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("reclaim/reclaim.db").display().to_string())
        .unwrap_or_else(|| "reclaim.db".to_string())
}

fn default_wal_mode() -> bool {
    true
}

/// Local file-object store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FilesConfig {
    /// Root directory holding one subdirectory per bucket.
    #[serde(default = "default_files_root")]
    pub root_dir: String,

    /// Base URL prefixed to issued public object URLs.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            root_dir: default_files_root(),
            public_base_url: default_public_base_url(),
        }
    }
}

fn default_files_root() -> String {
    dirs::data_dir()
        .map(|d| d.join("reclaim/objects").display().to_string())
        .unwrap_or_else(|| "objects".to_string())
}

fn default_public_base_url() -> String {
    "http://localhost:8000/storage".to_string()
}

/// Session provider configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Minimum accepted password length at sign-up.
    #[serde(default = "default_password_min_length")]
    pub password_min_length: usize,

    /// Path where the CLI persists the active session token.
    #[serde(default = "default_session_file")]
    pub session_file: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            password_min_length: default_password_min_length(),
            session_file: default_session_file(),
        }
    }
}

fn default_password_min_length() -> usize {
    6
}

fn default_session_file() -> String {
    dirs::state_dir()
        .or_else(dirs::data_dir)
        .map(|d| d.join("reclaim/session").display().to_string())
        .unwrap_or_else(|| ".reclaim-session".to_string())
}

/// Image upload limits, applied before bytes reach the file store.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct UploadConfig {
    /// Maximum accepted file size in bytes.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Accepted file extensions, lowercase, without the dot.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_max_bytes() -> u64 {
    5 * 1024 * 1024
}

fn default_allowed_extensions() -> Vec<String> {
    ["jpg", "jpeg", "png", "webp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
