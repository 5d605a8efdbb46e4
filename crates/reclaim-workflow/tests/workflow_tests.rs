// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Workflow behavior against the real SQLite gateway and a tempdir file
//! store, including the claim-approval atomicity and partial-success
//! guarantees.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tempfile::TempDir;

use reclaim_bus::{DomainEvent, EventBus};
use reclaim_config::model::{FilesConfig, StorageConfig, UploadConfig};
use reclaim_core::{
    Adapter, AdapterType, AuthUser, ClaimDecision, ClaimStatus, Collection, DataGateway, Filter,
    HealthStatus, ItemKind, ItemStatus, Query, ReclaimError, Row, SessionContext, WriteOp,
};
use reclaim_storage::{LocalFileStore, SqliteGateway};
use reclaim_workflow::{ItemQuery, LostAndFound, NewItem, ProfilePatch};

struct Harness {
    service: LostAndFound,
    gateway: Arc<dyn DataGateway>,
    bus: Arc<EventBus>,
    _dir: TempDir,
}

async fn harness() -> Harness {
    let dir = TempDir::new().unwrap();
    let gateway: Arc<dyn DataGateway> = Arc::new(
        SqliteGateway::connect(&StorageConfig {
            database_path: dir.path().join("reclaim.db").display().to_string(),
            wal_mode: true,
        })
        .await
        .unwrap(),
    );
    let files = Arc::new(LocalFileStore::new(&FilesConfig {
        root_dir: dir.path().join("objects").display().to_string(),
        public_base_url: "http://localhost:8000/storage".to_string(),
    }));
    let bus = Arc::new(EventBus::new());
    let service = LostAndFound::new(
        gateway.clone(),
        files,
        bus.clone(),
        UploadConfig::default(),
    );
    Harness {
        service,
        gateway,
        bus,
        _dir: dir,
    }
}

fn ctx(id: &str) -> SessionContext {
    SessionContext {
        user: AuthUser {
            id: id.to_string(),
            email: format!("{id}@campus.edu"),
        },
        token: format!("token-{id}"),
    }
}

fn backpack() -> NewItem {
    NewItem {
        title: "Blue Backpack".to_string(),
        description: "Nike backpack with a laptop sleeve".to_string(),
        category: "bags".to_string(),
        kind: ItemKind::Found,
        location: "Main Library".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        image_url: None,
    }
}

#[tokio::test]
async fn report_list_and_filter_items() {
    let h = harness().await;
    let owner = ctx("owner");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    assert_eq!(item.status, ItemStatus::Open);

    let mut lost = backpack();
    lost.title = "Red Umbrella".to_string();
    lost.kind = ItemKind::Lost;
    lost.category = "accessories".to_string();
    h.service.report_item(&owner, lost).await.unwrap();

    let all = h.service.list_items(&ItemQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);

    let found_only = h
        .service
        .list_items(&ItemQuery {
            kind: Some(ItemKind::Found),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found_only.len(), 1);
    assert_eq!(found_only[0].id, item.id);

    let searched = h
        .service
        .list_items(&ItemQuery {
            search: Some("umbrella".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].title, "Red Umbrella");
}

#[tokio::test]
async fn only_the_owner_may_edit_delete_or_change_status() {
    let h = harness().await;
    let owner = ctx("owner");
    let stranger = ctx("stranger");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();

    let err = h
        .service
        .change_item_status(&stranger, &item.id, ItemStatus::Resolved)
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));

    let err = h.service.delete_item(&stranger, &item.id).await.unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));

    h.service.delete_item(&owner, &item.id).await.unwrap();
    let err = h.service.get_item(&item.id).await.unwrap_err();
    assert!(matches!(err, ReclaimError::NotFound { .. }));
}

#[tokio::test]
async fn owner_may_resolve_directly_without_an_approved_claim() {
    let h = harness().await;
    let owner = ctx("owner");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    let updated = h
        .service
        .change_item_status(&owner, &item.id, ItemStatus::Resolved)
        .await
        .unwrap();
    assert_eq!(updated.status, ItemStatus::Resolved);

    // Backward moves are permitted too.
    let reopened = h
        .service
        .change_item_status(&owner, &item.id, ItemStatus::Open)
        .await
        .unwrap();
    assert_eq!(reopened.status, ItemStatus::Open);
}

#[tokio::test]
async fn claim_submission_policies() {
    let h = harness().await;
    let owner = ctx("owner");
    let claimant = ctx("claimant");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();

    // Owners cannot claim their own item.
    let err = h
        .service
        .submit_claim(&owner, &item.id, "http://proof")
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));

    h.service
        .submit_claim(&claimant, &item.id, "http://proof")
        .await
        .unwrap();

    // One claim per user per item.
    let err = h
        .service
        .submit_claim(&claimant, &item.id, "http://proof-2")
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Conflict(_)));

    // Resolved items take no new claims.
    h.service
        .change_item_status(&owner, &item.id, ItemStatus::Resolved)
        .await
        .unwrap();
    let other = ctx("other");
    let err = h
        .service
        .submit_claim(&other, &item.id, "http://proof-3")
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Conflict(_)));

    // The owner got a claim notification.
    let inbox = h.service.notifications_for(&owner, 10).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].actor_id.as_deref(), Some("claimant"));
}

#[tokio::test]
async fn approval_resolves_item_and_claim_atomically() {
    let h = harness().await;
    let owner = ctx("owner");
    let alice = ctx("alice");
    let bob = ctx("bob");
    let mut events = h.bus.subscribe_domain();

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    let alice_claim = h
        .service
        .submit_claim(&alice, &item.id, "http://proof-alice")
        .await
        .unwrap();
    h.service
        .submit_claim(&bob, &item.id, "http://proof-bob")
        .await
        .unwrap();

    let decided = h
        .service
        .adjudicate_claim(&owner, &alice_claim.id, ClaimDecision::Approved, None)
        .await
        .unwrap();
    assert_eq!(decided.status, ClaimStatus::Approved);
    assert_eq!(
        h.service.get_item(&item.id).await.unwrap().status,
        ItemStatus::Resolved
    );

    // Bob's claim is untouched and can no longer be approved.
    let bob_claim = h
        .service
        .claim_for(&item.id, "bob")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bob_claim.status, ClaimStatus::Pending);

    let err = h
        .service
        .adjudicate_claim(&owner, &bob_claim.id, ClaimDecision::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Conflict(_)));
    assert_eq!(
        h.service
            .claim_for(&item.id, "bob")
            .await
            .unwrap()
            .unwrap()
            .status,
        ClaimStatus::Pending
    );

    // Alice was notified of the verdict.
    let inbox = h.service.notifications_for(&alice, 10).await.unwrap();
    assert!(inbox.iter().any(|n| n.content.contains("approved")));

    // The bus carried the decision and the resolution.
    let mut saw_decided = false;
    let mut saw_resolved = false;
    while let Ok(envelope) = events.try_recv() {
        match envelope.event {
            DomainEvent::ClaimDecided { decision, .. } => {
                saw_decided = decision == ClaimDecision::Approved;
            }
            DomainEvent::ItemResolved { item_id } => saw_resolved = item_id == item.id,
            _ => {}
        }
    }
    assert!(saw_decided && saw_resolved);
}

#[tokio::test]
async fn rejection_leaves_the_item_open() {
    let h = harness().await;
    let owner = ctx("owner");
    let claimant = ctx("claimant");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    let claim = h
        .service
        .submit_claim(&claimant, &item.id, "http://proof")
        .await
        .unwrap();

    let decided = h
        .service
        .adjudicate_claim(
            &owner,
            &claim.id,
            ClaimDecision::Rejected,
            Some("proof does not match".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(decided.status, ClaimStatus::Rejected);
    assert_eq!(decided.admin_notes.as_deref(), Some("proof does not match"));
    assert_eq!(
        h.service.get_item(&item.id).await.unwrap().status,
        ItemStatus::Open
    );
}

#[tokio::test]
async fn non_owner_cannot_adjudicate() {
    let h = harness().await;
    let owner = ctx("owner");
    let claimant = ctx("claimant");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    let claim = h
        .service
        .submit_claim(&claimant, &item.id, "http://proof")
        .await
        .unwrap();

    let err = h
        .service
        .adjudicate_claim(&claimant, &claim.id, ClaimDecision::Approved, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));
}

#[tokio::test]
async fn comments_are_chronological_and_append_only() {
    let h = harness().await;
    let owner = ctx("owner");
    let other = ctx("other");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    h.service
        .post_comment(&other, &item.id, "Is this still available?")
        .await
        .unwrap();
    h.service
        .post_comment(&owner, &item.id, "Yes, come to the front desk")
        .await
        .unwrap();

    let thread = h.service.comments_for_item(&item.id).await.unwrap();
    assert_eq!(thread.len(), 2);
    assert_eq!(thread[0].user_id, "other");

    let err = h
        .service
        .post_comment(&other, &item.id, "   ")
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Validation(_)));
}

#[tokio::test]
async fn message_delivery_creates_one_row_and_one_notification() {
    let h = harness().await;
    let owner = ctx("owner");
    let finder = ctx("finder");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    let message = h
        .service
        .post_message(&finder, &item.id, "owner", "I think that's mine")
        .await
        .unwrap();
    assert_eq!(message.recipient_id, "owner");

    let thread = h.service.messages_for_item(&finder, &item.id).await.unwrap();
    assert_eq!(thread.len(), 1);

    // A third party sees nothing.
    let snoop = ctx("snoop");
    assert!(h
        .service
        .messages_for_item(&snoop, &item.id)
        .await
        .unwrap()
        .is_empty());

    let inbox = h.service.notifications_for(&owner, 10).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].content, "You have a new message");
    assert!(!inbox[0].read);
}

#[tokio::test]
async fn mark_notification_read_is_recipient_only_and_idempotent() {
    let h = harness().await;
    let owner = ctx("owner");
    let finder = ctx("finder");

    let item = h.service.report_item(&owner, backpack()).await.unwrap();
    h.service
        .post_message(&finder, &item.id, "owner", "hello")
        .await
        .unwrap();

    let inbox = h.service.notifications_for(&owner, 10).await.unwrap();
    let id = inbox[0].id.clone();

    let err = h
        .service
        .mark_notification_read(&finder, &id)
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Forbidden(_)));

    h.service.mark_notification_read(&owner, &id).await.unwrap();
    h.service.mark_notification_read(&owner, &id).await.unwrap();

    let inbox = h.service.notifications_for(&owner, 10).await.unwrap();
    assert!(inbox[0].read);
}

#[tokio::test]
async fn profiles_are_lazily_created_and_updatable() {
    let h = harness().await;
    let user = ctx("user-a");

    let profile = h.service.get_or_create_profile(&user).await.unwrap();
    assert_eq!(profile.id, "user-a");
    assert!(profile.full_name.is_none());

    let updated = h
        .service
        .update_profile(
            &user,
            ProfilePatch {
                full_name: Some("Alice Zhang".to_string()),
                department: Some("Physics".to_string()),
                year_of_study: Some(3),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Alice Zhang"));
    assert_eq!(updated.year_of_study, Some(3));

    let (item_owner_view, owner_profile) = {
        let item = h.service.report_item(&user, backpack()).await.unwrap();
        h.service.item_with_owner_profile(&item.id).await.unwrap()
    };
    assert_eq!(item_owner_view.user_id, "user-a");
    assert_eq!(
        owner_profile.unwrap().department.as_deref(),
        Some("Physics")
    );
}

#[tokio::test]
async fn uploads_validate_type_and_size_before_storing() {
    let h = harness().await;
    let user = ctx("user-a");

    let url = h
        .service
        .upload_item_image(&user, "photo.png", b"fake image bytes")
        .await
        .unwrap();
    assert!(url.starts_with("http://localhost:8000/storage/item-images/user-a/"));
    assert!(url.ends_with(".png"));

    let err = h
        .service
        .upload_item_image(&user, "notes.pdf", b"%PDF")
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Validation(_)));
}

/// Gateway decorator failing every notification insert, for the
/// partial-success property of message posting.
struct NotificationOutage {
    inner: Arc<dyn DataGateway>,
}

#[async_trait]
impl Adapter for NotificationOutage {
    fn name(&self) -> &str {
        "notification-outage"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 0, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Gateway
    }

    async fn health_check(&self) -> Result<HealthStatus, ReclaimError> {
        self.inner.health_check().await
    }

    async fn shutdown(&self) -> Result<(), ReclaimError> {
        self.inner.shutdown().await
    }
}

#[async_trait]
impl DataGateway for NotificationOutage {
    async fn select(&self, query: Query) -> Result<Vec<Row>, ReclaimError> {
        self.inner.select(query).await
    }

    async fn insert(
        &self,
        collection: Collection,
        rows: Vec<Row>,
    ) -> Result<Vec<Row>, ReclaimError> {
        if collection == Collection::Notifications {
            return Err(ReclaimError::remote("notification store unavailable"));
        }
        self.inner.insert(collection, rows).await
    }

    async fn update(
        &self,
        collection: Collection,
        patch: Row,
        filters: Vec<Filter>,
    ) -> Result<u64, ReclaimError> {
        self.inner.update(collection, patch, filters).await
    }

    async fn delete(&self, collection: Collection, filters: Vec<Filter>) -> Result<(), ReclaimError> {
        self.inner.delete(collection, filters).await
    }

    async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), ReclaimError> {
        self.inner.apply(ops).await
    }
}

#[tokio::test]
async fn message_survives_a_failed_notification_insert() {
    let h = harness().await;
    let owner = ctx("owner");
    let finder = ctx("finder");
    let item = h.service.report_item(&owner, backpack()).await.unwrap();

    let flaky = LostAndFound::new(
        Arc::new(NotificationOutage {
            inner: h.gateway.clone(),
        }),
        Arc::new(LocalFileStore::new(&FilesConfig {
            root_dir: h._dir.path().join("objects").display().to_string(),
            public_base_url: "http://localhost:8000/storage".to_string(),
        })),
        h.bus.clone(),
        UploadConfig::default(),
    );

    let err = flaky
        .post_message(&finder, &item.id, "owner", "are you there?")
        .await
        .unwrap_err();
    assert!(matches!(err, ReclaimError::Remote { .. }));

    // The message row persists even though the call errored.
    let thread = h.service.messages_for_item(&finder, &item.id).await.unwrap();
    assert_eq!(thread.len(), 1);
    assert_eq!(thread[0].content, "are you there?");

    // And no notification was delivered.
    assert!(h
        .service
        .notifications_for(&owner, 10)
        .await
        .unwrap()
        .is_empty());
}
