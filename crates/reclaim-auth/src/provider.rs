// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway-backed session provider: accounts and session tokens live in the
//! `users` and `sessions` collections, passwords are held as Argon2id hashes.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use reclaim_config::model::AuthConfig;
use reclaim_core::types::{from_row, to_row};
use reclaim_core::{
    Adapter, AdapterType, AuthUser, Collection, DataGateway, Filter, HealthStatus, Query,
    ReclaimError, SessionContext, SessionProvider,
};

const BAD_CREDENTIALS: &str = "invalid email or password";

#[derive(Debug, Serialize, Deserialize)]
struct UserRecord {
    id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionRecord {
    token: String,
    user_id: String,
    created_at: DateTime<Utc>,
}

/// [`SessionProvider`] storing accounts and sessions through the data
/// gateway. Tracks at most one active session in memory.
pub struct LocalSessionProvider {
    gateway: Arc<dyn DataGateway>,
    password_min_length: usize,
    current: ArcSwapOption<SessionContext>,
}

impl LocalSessionProvider {
    pub fn new(gateway: Arc<dyn DataGateway>, config: &AuthConfig) -> Self {
        Self {
            gateway,
            password_min_length: config.password_min_length,
            current: ArcSwapOption::empty(),
        }
    }

    async fn find_user(&self, filter: Filter) -> Result<Option<UserRecord>, ReclaimError> {
        let rows = self
            .gateway
            .select(Query::new(Collection::Users).filter(filter).limit(1))
            .await?;
        rows.into_iter().next().map(from_row).transpose()
    }

    fn open_session(&self, ctx: &SessionContext) {
        self.current.store(Some(Arc::new(ctx.clone())));
    }
}

fn hash_password(password: &str) -> Result<String, ReclaimError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| ReclaimError::Internal(format!("password hashing failed: {err}")))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool, ReclaimError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| ReclaimError::Internal(format!("stored hash is malformed: {err}")))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(err) => Err(ReclaimError::Internal(format!(
            "password verification failed: {err}"
        ))),
    }
}

#[async_trait]
impl Adapter for LocalSessionProvider {
    fn name(&self) -> &str {
        "local-sessions"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Auth
    }

    async fn health_check(&self) -> Result<HealthStatus, ReclaimError> {
        self.gateway
            .select(Query::new(Collection::Users).limit(1))
            .await?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReclaimError> {
        self.current.store(None);
        Ok(())
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    fn current_user(&self) -> Option<AuthUser> {
        self.current.load().as_ref().map(|ctx| ctx.user.clone())
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, ReclaimError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ReclaimError::Validation(
                "a valid email address is required".to_string(),
            ));
        }
        if password.len() < self.password_min_length {
            return Err(ReclaimError::Validation(format!(
                "password must be at least {} characters",
                self.password_min_length
            )));
        }
        if self.find_user(Filter::eq("email", email.clone())).await?.is_some() {
            return Err(ReclaimError::auth(
                "an account with this email already exists",
            ));
        }

        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            email: email.clone(),
            password_hash: hash_password(password)?,
            created_at: Utc::now(),
        };
        self.gateway
            .insert(Collection::Users, vec![to_row(&record)?])
            .await?;
        info!(email, "registered account");
        Ok(AuthUser {
            id: record.id,
            email: record.email,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<SessionContext, ReclaimError> {
        let email = email.trim().to_lowercase();
        let user = self
            .find_user(Filter::eq("email", email.clone()))
            .await?
            .ok_or_else(|| ReclaimError::auth(BAD_CREDENTIALS))?;
        if !verify_password(password, &user.password_hash)? {
            return Err(ReclaimError::auth(BAD_CREDENTIALS));
        }

        let session = SessionRecord {
            token: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            created_at: Utc::now(),
        };
        self.gateway
            .insert(Collection::Sessions, vec![to_row(&session)?])
            .await?;

        let ctx = SessionContext {
            user: AuthUser {
                id: user.id,
                email: user.email,
            },
            token: session.token,
        };
        self.open_session(&ctx);
        debug!(user_id = %ctx.user.id, "opened session");
        Ok(ctx)
    }

    async fn resume(&self, token: &str) -> Result<SessionContext, ReclaimError> {
        let rows = self
            .gateway
            .select(
                Query::new(Collection::Sessions)
                    .filter(Filter::eq("token", token))
                    .limit(1),
            )
            .await?;
        let session: SessionRecord = rows
            .into_iter()
            .next()
            .map(from_row)
            .transpose()?
            .ok_or_else(|| ReclaimError::auth("session expired or unknown"))?;
        let user = self
            .find_user(Filter::eq("id", session.user_id.clone()))
            .await?
            .ok_or_else(|| ReclaimError::auth("session expired or unknown"))?;

        let ctx = SessionContext {
            user: AuthUser {
                id: user.id,
                email: user.email,
            },
            token: session.token,
        };
        self.open_session(&ctx);
        Ok(ctx)
    }

    async fn sign_out(&self) -> Result<(), ReclaimError> {
        if let Some(ctx) = self.current.swap(None) {
            self.gateway
                .delete(
                    Collection::Sessions,
                    vec![Filter::eq("token", ctx.token.clone())],
                )
                .await?;
            debug!(user_id = %ctx.user.id, "closed session");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reclaim_config::model::StorageConfig;
    use reclaim_storage::SqliteGateway;
    use tempfile::tempdir;

    async fn make_provider(dir: &tempfile::TempDir) -> LocalSessionProvider {
        let gateway = SqliteGateway::connect(&StorageConfig {
            database_path: dir.path().join("auth.db").display().to_string(),
            wal_mode: true,
        })
        .await
        .unwrap();
        LocalSessionProvider::new(
            Arc::new(gateway),
            &AuthConfig {
                password_min_length: 6,
                session_file: String::new(),
            },
        )
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_opens_a_session() {
        let dir = tempdir().unwrap();
        let provider = make_provider(&dir).await;

        let user = provider.sign_up("alice@campus.edu", "hunter22").await.unwrap();
        assert_eq!(user.email, "alice@campus.edu");
        assert!(provider.current_user().is_none());

        let ctx = provider.sign_in("alice@campus.edu", "hunter22").await.unwrap();
        assert_eq!(ctx.user.id, user.id);
        assert_eq!(provider.current_user().unwrap().id, user.id);
    }

    #[tokio::test]
    async fn sign_up_rejects_short_passwords_and_bad_emails() {
        let dir = tempdir().unwrap();
        let provider = make_provider(&dir).await;

        let err = provider.sign_up("alice@campus.edu", "12345").await.unwrap_err();
        assert!(matches!(err, ReclaimError::Validation(_)));

        let err = provider.sign_up("not-an-email", "hunter22").await.unwrap_err();
        assert!(matches!(err, ReclaimError::Validation(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let dir = tempdir().unwrap();
        let provider = make_provider(&dir).await;

        provider.sign_up("alice@campus.edu", "hunter22").await.unwrap();
        let err = provider
            .sign_up("Alice@Campus.edu", "different1")
            .await
            .unwrap_err();
        assert!(matches!(err, ReclaimError::Auth { .. }));
    }

    #[tokio::test]
    async fn sign_in_with_wrong_password_fails_generically() {
        let dir = tempdir().unwrap();
        let provider = make_provider(&dir).await;

        provider.sign_up("alice@campus.edu", "hunter22").await.unwrap();
        let err = provider
            .sign_in("alice@campus.edu", "wrong-pass")
            .await
            .unwrap_err();
        match err {
            ReclaimError::Auth { message } => assert_eq!(message, BAD_CREDENTIALS),
            other => panic!("expected auth error, got {other:?}"),
        }

        let err = provider
            .sign_in("nobody@campus.edu", "hunter22")
            .await
            .unwrap_err();
        match err {
            ReclaimError::Auth { message } => assert_eq!(message, BAD_CREDENTIALS),
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn resume_restores_a_session_from_its_token() {
        let dir = tempdir().unwrap();
        let provider = make_provider(&dir).await;

        provider.sign_up("alice@campus.edu", "hunter22").await.unwrap();
        let ctx = provider.sign_in("alice@campus.edu", "hunter22").await.unwrap();

        let resumed = provider.resume(&ctx.token).await.unwrap();
        assert_eq!(resumed.user.id, ctx.user.id);

        let err = provider.resume("no-such-token").await.unwrap_err();
        assert!(matches!(err, ReclaimError::Auth { .. }));
    }

    #[tokio::test]
    async fn sign_out_invalidates_the_token() {
        let dir = tempdir().unwrap();
        let provider = make_provider(&dir).await;

        provider.sign_up("alice@campus.edu", "hunter22").await.unwrap();
        let ctx = provider.sign_in("alice@campus.edu", "hunter22").await.unwrap();

        provider.sign_out().await.unwrap();
        assert!(provider.current_user().is_none());
        let err = provider.resume(&ctx.token).await.unwrap_err();
        assert!(matches!(err, ReclaimError::Auth { .. }));
    }
}
