// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter wiring: gateway, file store, session provider, and event bus
//! assembled from the loaded configuration.

use std::sync::Arc;

use reclaim_auth::LocalSessionProvider;
use reclaim_bus::EventBus;
use reclaim_config::model::ReclaimConfig;
use reclaim_core::{DataGateway, ReclaimError, SessionContext, SessionProvider};
use reclaim_storage::{LocalFileStore, SqliteGateway};
use reclaim_workflow::LostAndFound;
use tracing::{debug, info};

pub struct App {
    pub config: ReclaimConfig,
    pub sessions: Arc<LocalSessionProvider>,
    pub service: LostAndFound,
    pub bus: Arc<EventBus>,
}

impl App {
    pub async fn init(config: ReclaimConfig) -> Result<Self, ReclaimError> {
        let bus = Arc::new(EventBus::new());
        let gateway: Arc<dyn DataGateway> = Arc::new(
            SqliteGateway::connect(&config.storage)
                .await?
                .with_publisher(bus.clone()),
        );
        debug!(path = %config.storage.database_path, "gateway connected");
        let files = Arc::new(LocalFileStore::new(&config.files));
        let sessions = Arc::new(LocalSessionProvider::new(gateway.clone(), &config.auth));
        let service = LostAndFound::new(gateway, files, bus.clone(), config.uploads.clone());
        info!(objects = %config.files.root_dir, "adapters wired");
        Ok(Self {
            config,
            sessions,
            service,
            bus,
        })
    }

    /// Restores the session persisted by `reclaim login`.
    pub async fn require_session(&self) -> Result<SessionContext, ReclaimError> {
        let token = crate::auth::read_session_token(&self.config.auth.session_file)?
            .ok_or_else(|| ReclaimError::auth("not signed in; run `reclaim login` first"))?;
        self.sessions.resume(&token).await
    }
}
