// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./reclaim.toml` > `~/.config/reclaim/reclaim.toml`
//! > `/etc/reclaim/reclaim.toml`, with environment variable overrides via the
//! `RECLAIM_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::ReclaimConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/reclaim/reclaim.toml` (system-wide)
/// 3. `~/.config/reclaim/reclaim.toml` (user XDG config)
/// 4. `./reclaim.toml` (local directory)
/// 5. `RECLAIM_*` environment variables
pub fn load_config() -> Result<ReclaimConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ReclaimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReclaimConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ReclaimConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ReclaimConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(ReclaimConfig::default()))
        .merge(Toml::file("/etc/reclaim/reclaim.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("reclaim/reclaim.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("reclaim.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `RECLAIM_AUTH_PASSWORD_MIN_LENGTH` must
/// map to `auth.password_min_length`, not `auth.password.min.length`.
fn env_provider() -> Env {
    Env::prefixed("RECLAIM_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: RECLAIM_STORAGE_DATABASE_PATH -> "storage_database_path"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("service_", "service.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("files_", "files.", 1)
            .replacen("auth_", "auth.", 1)
            .replacen("uploads_", "uploads.", 1);
        mapped.into()
    })
}
