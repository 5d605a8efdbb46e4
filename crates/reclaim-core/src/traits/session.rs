// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session provider trait for authentication and the current-user value.

use async_trait::async_trait;

use crate::error::ReclaimError;
use crate::traits::adapter::Adapter;
use crate::types::{AuthUser, SessionContext};

/// Adapter issuing and validating logged-in identities.
///
/// The provider tracks at most one active session: it is set on
/// [`sign_in`](SessionProvider::sign_in) or
/// [`resume`](SessionProvider::resume) and cleared on
/// [`sign_out`](SessionProvider::sign_out). Workflow calls receive the
/// [`SessionContext`] explicitly rather than reading it from the provider.
#[async_trait]
pub trait SessionProvider: Adapter {
    /// Returns the currently signed-in user, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Registers a new account. Does not sign the user in.
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, ReclaimError>;

    /// Verifies credentials and opens a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext, ReclaimError>;

    /// Restores a session from a previously issued token.
    async fn resume(&self, token: &str) -> Result<SessionContext, ReclaimError>;

    /// Closes the active session, invalidating its token.
    async fn sign_out(&self) -> Result<(), ReclaimError>;
}
