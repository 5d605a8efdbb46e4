// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Reclaim lost-and-found service.

use thiserror::Error;

use crate::types::Collection;

/// The primary error type used across all Reclaim adapter traits and
/// workflow operations.
#[derive(Debug, Error)]
pub enum ReclaimError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Remote data gateway errors (connection failure, query failure, serialization).
    #[error("remote error: {message}")]
    Remote {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Session provider errors (sign-in, sign-up, sign-out, token resumption).
    #[error("auth error: {message}")]
    Auth { message: String },

    /// Client-side validation errors (missing field, oversized file, weak password).
    #[error("validation error: {0}")]
    Validation(String),

    /// The caller is authenticated but not allowed to perform the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A row the operation depends on does not exist.
    #[error("not found: {collection} `{id}`")]
    NotFound { collection: Collection, id: String },

    /// A guarded write lost a race or would violate a workflow policy.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ReclaimError {
    /// Wrap an arbitrary error as a gateway failure.
    pub fn remote(message: impl Into<String>) -> Self {
        ReclaimError::Remote {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an arbitrary error as a gateway failure, keeping the source chain.
    pub fn remote_with(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ReclaimError::Remote {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build an auth failure with the given message.
    pub fn auth(message: impl Into<String>) -> Self {
        ReclaimError::Auth {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ReclaimError {
    fn from(err: serde_json::Error) -> Self {
        ReclaimError::Remote {
            message: "row serialization failed".to_string(),
            source: Some(Box::new(err)),
        }
    }
}
