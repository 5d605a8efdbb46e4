// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The lost-and-found workflow: item lifecycle, claim adjudication,
//! comments, item-scoped messaging, notifications, and profiles.
//!
//! Every authenticated operation takes an explicit [`SessionContext`];
//! authorization compares against it, never against ambient state. Completed
//! steps are never retried or rolled back: the only multi-write operation
//! with atomicity requirements, claim approval, goes through a single
//! guarded gateway batch.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use reclaim_bus::{DomainEvent, Envelope, EventBus};
use reclaim_config::model::UploadConfig;
use reclaim_core::{
    Bucket, ClaimDecision, ClaimStatus, Collection, Comment, DataGateway, FileStore, Filter,
    Item, ItemClaim, ItemKind, ItemStatus, Message, Notification, NotificationKind, Profile,
    ReclaimError, Row, SessionContext, WriteOp,
};

use crate::repo::{claims, comments, items, messages, notifications, profiles};
use crate::repo::items::ItemQuery;
use crate::uploads;

/// Default page size for the notification dropdown.
pub const NOTIFICATION_LIMIT: i64 = 10;

/// Input for a new item report.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub category: String,
    pub kind: ItemKind,
    pub location: String,
    pub date: NaiveDate,
    pub image_url: Option<String>,
}

/// Partial update to an item report. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub date: Option<NaiveDate>,
    pub image_url: Option<String>,
}

/// Partial update to a profile. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub full_name: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
    pub year_of_study: Option<i64>,
    pub avatar_url: Option<String>,
}

/// The main workflow service, wiring the gateway, file store, and event bus.
pub struct LostAndFound {
    gateway: Arc<dyn DataGateway>,
    files: Arc<dyn FileStore>,
    bus: Arc<EventBus>,
    uploads: UploadConfig,
}

impl LostAndFound {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        files: Arc<dyn FileStore>,
        bus: Arc<EventBus>,
        uploads: UploadConfig,
    ) -> Self {
        Self {
            gateway,
            files,
            bus,
            uploads,
        }
    }

    fn gateway(&self) -> &dyn DataGateway {
        self.gateway.as_ref()
    }

    // --- Items ---

    pub async fn report_item(
        &self,
        ctx: &SessionContext,
        input: NewItem,
    ) -> Result<Item, ReclaimError> {
        let title = non_empty("title", &input.title)?;
        let description = non_empty("description", &input.description)?;
        let category = non_empty("category", &input.category)?;
        let location = non_empty("location", &input.location)?;

        let now = Utc::now();
        let item = Item {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            category,
            kind: input.kind,
            status: ItemStatus::Open,
            location,
            date: input.date,
            image_url: input.image_url,
            user_id: ctx.user_id().to_string(),
            created_at: now,
            updated_at: now,
        };
        items::insert(self.gateway(), &item).await?;
        info!(item_id = %item.id, kind = %item.kind, "item reported");
        self.bus.emit(Envelope::now(DomainEvent::ItemReported {
            item_id: item.id.clone(),
            owner_id: item.user_id.clone(),
        }));
        Ok(item)
    }

    pub async fn edit_item(
        &self,
        ctx: &SessionContext,
        item_id: &str,
        patch: ItemPatch,
    ) -> Result<Item, ReclaimError> {
        let item = items::fetch(self.gateway(), item_id).await?;
        require_owner(&item, ctx, "edit the item")?;

        let mut row = Row::new();
        set_string(&mut row, "title", patch.title);
        set_string(&mut row, "description", patch.description);
        set_string(&mut row, "category", patch.category);
        set_string(&mut row, "location", patch.location);
        if let Some(date) = patch.date {
            row.insert("date".to_string(), serde_json::json!(date));
        }
        set_string(&mut row, "image_url", patch.image_url);
        if row.is_empty() {
            return Ok(item);
        }
        row.insert("updated_at".to_string(), serde_json::json!(Utc::now()));

        items::update_fields(self.gateway(), item_id, row).await?;
        items::fetch(self.gateway(), item_id).await
    }

    pub async fn delete_item(
        &self,
        ctx: &SessionContext,
        item_id: &str,
    ) -> Result<(), ReclaimError> {
        let item = items::fetch(self.gateway(), item_id).await?;
        require_owner(&item, ctx, "delete the item")?;
        items::delete_owned(self.gateway(), item_id, ctx.user_id()).await?;
        info!(item_id, "item deleted");
        Ok(())
    }

    pub async fn list_items(&self, query: &ItemQuery) -> Result<Vec<Item>, ReclaimError> {
        items::list(self.gateway(), query).await
    }

    pub async fn get_item(&self, item_id: &str) -> Result<Item, ReclaimError> {
        items::fetch(self.gateway(), item_id).await
    }

    /// The item detail view: the report plus its reporter's profile when one
    /// exists.
    pub async fn item_with_owner_profile(
        &self,
        item_id: &str,
    ) -> Result<(Item, Option<Profile>), ReclaimError> {
        let item = items::fetch(self.gateway(), item_id).await?;
        let profile = profiles::fetch(self.gateway(), &item.user_id).await?;
        Ok((item, profile))
    }

    /// Owner-only, unconditional status overwrite. There is no transition
    /// table: backward moves from `resolved` are permitted.
    pub async fn change_item_status(
        &self,
        ctx: &SessionContext,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<Item, ReclaimError> {
        let item = items::fetch(self.gateway(), item_id).await?;
        require_owner(&item, ctx, "change the item status")?;

        let mut row = Row::new();
        row.insert("status".to_string(), serde_json::json!(status));
        row.insert("updated_at".to_string(), serde_json::json!(Utc::now()));
        items::update_fields(self.gateway(), item_id, row).await?;

        if status == ItemStatus::Resolved {
            self.bus.emit(Envelope::now(DomainEvent::ItemResolved {
                item_id: item_id.to_string(),
            }));
        }
        items::fetch(self.gateway(), item_id).await
    }

    // --- Comments ---

    pub async fn post_comment(
        &self,
        ctx: &SessionContext,
        item_id: &str,
        content: &str,
    ) -> Result<Comment, ReclaimError> {
        let content = non_empty("comment", content)?;
        items::fetch(self.gateway(), item_id).await?;

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            user_id: ctx.user_id().to_string(),
            content,
            created_at: Utc::now(),
        };
        comments::insert(self.gateway(), &comment).await?;
        Ok(comment)
    }

    pub async fn comments_for_item(&self, item_id: &str) -> Result<Vec<Comment>, ReclaimError> {
        comments::for_item(self.gateway(), item_id).await
    }

    // --- Claims ---

    /// Submits a `pending` ownership claim. The owner cannot claim their own
    /// item, one claim per user per item, and resolved items take no new
    /// claims. The owner is notified best-effort.
    pub async fn submit_claim(
        &self,
        ctx: &SessionContext,
        item_id: &str,
        proof_url: &str,
    ) -> Result<ItemClaim, ReclaimError> {
        let proof_url = non_empty("proof of ownership", proof_url)?;
        let item = items::fetch(self.gateway(), item_id).await?;
        if item.user_id == ctx.user_id() {
            return Err(ReclaimError::Forbidden(
                "you cannot claim your own item".to_string(),
            ));
        }
        if item.status == ItemStatus::Resolved {
            return Err(ReclaimError::Conflict(
                "this item has already been resolved".to_string(),
            ));
        }
        if claims::claim_for(self.gateway(), item_id, ctx.user_id())
            .await?
            .is_some()
        {
            return Err(ReclaimError::Conflict(
                "you already have a claim on this item".to_string(),
            ));
        }

        let now = Utc::now();
        let claim = ItemClaim {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            claimed_by: ctx.user_id().to_string(),
            claim_date: now,
            proof_of_ownership: proof_url,
            status: ClaimStatus::Pending,
            admin_notes: None,
            created_at: now,
            updated_at: now,
        };
        claims::insert(self.gateway(), &claim).await?;
        info!(claim_id = %claim.id, item_id, "claim submitted");

        self.notify_best_effort(Notification {
            id: Uuid::new_v4().to_string(),
            user_id: item.user_id.clone(),
            kind: NotificationKind::Claim,
            content: format!("New ownership claim on \"{}\"", item.title),
            item_id: item_id.to_string(),
            actor_id: Some(ctx.user_id().to_string()),
            read: false,
            created_at: Utc::now(),
        })
        .await;

        self.bus.emit(Envelope::now(DomainEvent::ClaimSubmitted {
            claim_id: claim.id.clone(),
            item_id: item_id.to_string(),
            claimed_by: claim.claimed_by.clone(),
        }));
        Ok(claim)
    }

    pub async fn claim_for(
        &self,
        item_id: &str,
        claimant: &str,
    ) -> Result<Option<ItemClaim>, ReclaimError> {
        claims::claim_for(self.gateway(), item_id, claimant).await
    }

    pub async fn claims_for_item(&self, item_id: &str) -> Result<Vec<ItemClaim>, ReclaimError> {
        claims::for_item(self.gateway(), item_id).await
    }

    /// Adjudicates a pending claim. Approval moves the claim to `approved`
    /// and the item to `resolved` in one guarded atomic batch; a concurrent
    /// decision or an already-resolved item aborts with a conflict and
    /// leaves both rows untouched. Rejection updates the claim alone.
    pub async fn adjudicate_claim(
        &self,
        ctx: &SessionContext,
        claim_id: &str,
        decision: ClaimDecision,
        admin_notes: Option<String>,
    ) -> Result<ItemClaim, ReclaimError> {
        let claim = claims::fetch(self.gateway(), claim_id).await?;
        let item = items::fetch(self.gateway(), &claim.item_id).await?;
        require_owner(&item, ctx, "adjudicate claims on the item")?;
        if claim.status != ClaimStatus::Pending {
            return Err(ReclaimError::Conflict(
                "this claim has already been decided".to_string(),
            ));
        }

        let now = Utc::now();
        let mut claim_patch = Row::new();
        claim_patch.insert(
            "status".to_string(),
            serde_json::json!(ClaimStatus::from(decision)),
        );
        if let Some(notes) = &admin_notes {
            claim_patch.insert("admin_notes".to_string(), serde_json::json!(notes));
        }
        claim_patch.insert("updated_at".to_string(), serde_json::json!(now));

        let mut batch = vec![WriteOp::Update {
            collection: Collection::ItemClaims,
            patch: claim_patch,
            filters: vec![
                Filter::eq("id", claim_id),
                Filter::eq("status", ClaimStatus::Pending.to_string()),
            ],
            guard: Some("this claim has already been decided".to_string()),
        }];
        if decision == ClaimDecision::Approved {
            let mut item_patch = Row::new();
            item_patch.insert("status".to_string(), serde_json::json!(ItemStatus::Resolved));
            item_patch.insert("updated_at".to_string(), serde_json::json!(now));
            batch.push(WriteOp::Update {
                collection: Collection::Items,
                patch: item_patch,
                filters: vec![
                    Filter::eq("id", claim.item_id.clone()),
                    Filter::ne("status", ItemStatus::Resolved.to_string()),
                ],
                guard: Some("the item has already been resolved".to_string()),
            });
        }
        self.gateway.apply(batch).await?;
        info!(claim_id, decision = %decision, "claim adjudicated");

        let verdict = match decision {
            ClaimDecision::Approved => "approved",
            ClaimDecision::Rejected => "rejected",
        };
        self.notify_best_effort(Notification {
            id: Uuid::new_v4().to_string(),
            user_id: claim.claimed_by.clone(),
            kind: NotificationKind::Claim,
            content: format!("Your claim on \"{}\" was {verdict}", item.title),
            item_id: claim.item_id.clone(),
            actor_id: Some(ctx.user_id().to_string()),
            read: false,
            created_at: Utc::now(),
        })
        .await;

        self.bus.emit(Envelope::now(DomainEvent::ClaimDecided {
            claim_id: claim_id.to_string(),
            item_id: claim.item_id.clone(),
            decision,
        }));
        if decision == ClaimDecision::Approved {
            self.bus.emit(Envelope::now(DomainEvent::ItemResolved {
                item_id: claim.item_id.clone(),
            }));
        }
        claims::fetch(self.gateway(), claim_id).await
    }

    // --- Messages ---

    /// Posts a direct message on an item and notifies the recipient. The two
    /// inserts are sequential, not transactional: when the notification
    /// insert fails the error surfaces, but the message row persists.
    pub async fn post_message(
        &self,
        ctx: &SessionContext,
        item_id: &str,
        recipient_id: &str,
        content: &str,
    ) -> Result<Message, ReclaimError> {
        let content = non_empty("message", content)?;
        if recipient_id == ctx.user_id() {
            return Err(ReclaimError::Validation(
                "you cannot message yourself".to_string(),
            ));
        }
        items::fetch(self.gateway(), item_id).await?;

        let message = Message {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            sender_id: ctx.user_id().to_string(),
            recipient_id: recipient_id.to_string(),
            content,
            created_at: Utc::now(),
        };
        messages::insert(self.gateway(), &message).await?;

        notifications::insert(
            self.gateway(),
            &Notification {
                id: Uuid::new_v4().to_string(),
                user_id: recipient_id.to_string(),
                kind: NotificationKind::Message,
                content: "You have a new message".to_string(),
                item_id: item_id.to_string(),
                actor_id: Some(ctx.user_id().to_string()),
                read: false,
                created_at: Utc::now(),
            },
        )
        .await?;

        self.bus.emit(Envelope::now(DomainEvent::MessagePosted {
            message_id: message.id.clone(),
            item_id: item_id.to_string(),
            sender_id: message.sender_id.clone(),
            recipient_id: message.recipient_id.clone(),
        }));
        Ok(message)
    }

    pub async fn messages_for_item(
        &self,
        ctx: &SessionContext,
        item_id: &str,
    ) -> Result<Vec<Message>, ReclaimError> {
        messages::for_item_participant(self.gateway(), item_id, ctx.user_id()).await
    }

    // --- Notifications ---

    pub async fn notifications_for(
        &self,
        ctx: &SessionContext,
        limit: i64,
    ) -> Result<Vec<Notification>, ReclaimError> {
        notifications::for_user(self.gateway(), ctx.user_id(), limit).await
    }

    /// Recipient-only and idempotent: marking an already-read notification
    /// succeeds without effect.
    pub async fn mark_notification_read(
        &self,
        ctx: &SessionContext,
        notification_id: &str,
    ) -> Result<(), ReclaimError> {
        let notification = notifications::fetch(self.gateway(), notification_id).await?;
        if notification.user_id != ctx.user_id() {
            return Err(ReclaimError::Forbidden(
                "only the recipient may mark a notification read".to_string(),
            ));
        }
        notifications::mark_read(self.gateway(), notification_id).await
    }

    // --- Profiles ---

    /// Fetches the caller's profile, creating an empty one on first view.
    pub async fn get_or_create_profile(
        &self,
        ctx: &SessionContext,
    ) -> Result<Profile, ReclaimError> {
        if let Some(profile) = profiles::fetch(self.gateway(), ctx.user_id()).await? {
            return Ok(profile);
        }
        let now = Utc::now();
        let profile = Profile {
            id: ctx.user_id().to_string(),
            full_name: None,
            student_id: None,
            department: None,
            phone: None,
            year_of_study: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        profiles::insert(self.gateway(), &profile).await?;
        Ok(profile)
    }

    pub async fn update_profile(
        &self,
        ctx: &SessionContext,
        patch: ProfilePatch,
    ) -> Result<Profile, ReclaimError> {
        let profile = self.get_or_create_profile(ctx).await?;

        let mut row = Row::new();
        set_string(&mut row, "full_name", patch.full_name);
        set_string(&mut row, "student_id", patch.student_id);
        set_string(&mut row, "department", patch.department);
        set_string(&mut row, "phone", patch.phone);
        if let Some(year) = patch.year_of_study {
            row.insert("year_of_study".to_string(), serde_json::json!(year));
        }
        set_string(&mut row, "avatar_url", patch.avatar_url);
        if row.is_empty() {
            return Ok(profile);
        }
        row.insert("updated_at".to_string(), serde_json::json!(Utc::now()));

        profiles::update_fields(self.gateway(), ctx.user_id(), row).await?;
        profiles::fetch(self.gateway(), ctx.user_id())
            .await?
            .ok_or_else(|| ReclaimError::NotFound {
                collection: Collection::Profiles,
                id: ctx.user_id().to_string(),
            })
    }

    // --- Uploads ---

    pub async fn upload_item_image(
        &self,
        ctx: &SessionContext,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ReclaimError> {
        self.store_image(Bucket::ItemImages, ctx.user_id(), file_name, bytes)
            .await
    }

    /// Proof images are scoped to the item-claimant pair.
    pub async fn upload_proof(
        &self,
        ctx: &SessionContext,
        item_id: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ReclaimError> {
        let owner = format!("{item_id}-{}", ctx.user_id());
        self.store_image(Bucket::Proofs, &owner, file_name, bytes)
            .await
    }

    pub async fn upload_avatar(
        &self,
        ctx: &SessionContext,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ReclaimError> {
        self.store_image(Bucket::Avatars, ctx.user_id(), file_name, bytes)
            .await
    }

    async fn store_image(
        &self,
        bucket: Bucket,
        owner: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<String, ReclaimError> {
        let extension = uploads::validate_upload(file_name, bytes.len() as u64, &self.uploads)?;
        let path = uploads::object_path(owner, &extension);
        self.files.upload(bucket, &path, bytes).await?;
        Ok(self.files.public_url(bucket, &path))
    }

    async fn notify_best_effort(&self, notification: Notification) {
        if let Err(err) = notifications::insert(self.gateway(), &notification).await {
            warn!(recipient = %notification.user_id, %err, "failed to deliver notification");
        }
    }
}

fn non_empty(field: &str, value: &str) -> Result<String, ReclaimError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ReclaimError::Validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn require_owner(item: &Item, ctx: &SessionContext, action: &str) -> Result<(), ReclaimError> {
    if item.user_id != ctx.user_id() {
        return Err(ReclaimError::Forbidden(format!(
            "only the item owner may {action}"
        )));
    }
    Ok(())
}

fn set_string(row: &mut Row, column: &str, value: Option<String>) {
    if let Some(value) = value {
        row.insert(column.to_string(), serde_json::Value::String(value));
    }
}
