// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the Reclaim workflow.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

use crate::error::ReclaimError;

/// A generic gateway row: a flat JSON object keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Serialize a domain value into a gateway row.
pub fn to_row<T: Serialize>(value: &T) -> Result<Row, ReclaimError> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(ReclaimError::Internal(format!(
            "expected an object row, got {other}"
        ))),
    }
}

/// Deserialize a gateway row into a domain value.
pub fn from_row<T: serde::de::DeserializeOwned>(row: Row) -> Result<T, ReclaimError> {
    Ok(serde_json::from_value(serde_json::Value::Object(row))?)
}

/// Named collections exposed by the remote data gateway.
///
/// `Users` and `Sessions` back the local session provider only; the
/// application-facing collections match the hosted backend's tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Items,
    Profiles,
    Comments,
    Messages,
    Notifications,
    ItemClaims,
    Users,
    Sessions,
}

/// File-object storage buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Bucket {
    ItemImages,
    Proofs,
    Avatars,
}

/// A row-level predicate applied to gateway reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Column equals value.
    Eq(String, serde_json::Value),
    /// Column does not equal value.
    Ne(String, serde_json::Value),
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Filter::Eq(column.into(), value.into())
    }

    pub fn ne(column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Filter::Ne(column.into(), value.into())
    }

    /// Evaluate the predicate against a row. Missing columns compare as null.
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq(column, value) => {
                row.get(column).unwrap_or(&serde_json::Value::Null) == value
            }
            Filter::Ne(column, value) => {
                row.get(column).unwrap_or(&serde_json::Value::Null) != value
            }
        }
    }
}

/// Single-column ordering for gateway reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub column: String,
    pub descending: bool,
}

/// A filtered, ordered read against one collection.
#[derive(Debug, Clone)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub order: Option<OrderBy>,
    pub limit: Option<i64>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_asc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending: false,
        });
        self
    }

    pub fn order_desc(mut self, column: impl Into<String>) -> Self {
        self.order = Some(OrderBy {
            column: column.into(),
            descending: true,
        });
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// One write inside a transactional gateway batch.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Insert {
        collection: Collection,
        row: Row,
    },
    /// A guarded update aborts the whole batch with a conflict carrying
    /// `guard` as its message when the filters match zero rows.
    Update {
        collection: Collection,
        patch: Row,
        filters: Vec<Filter>,
        guard: Option<String>,
    },
    Delete {
        collection: Collection,
        filters: Vec<Filter>,
    },
}

/// A row-insert event delivered through the realtime feed.
#[derive(Debug, Clone)]
pub struct RowEvent {
    pub collection: Collection,
    pub row: Row,
}

/// Opaque handle identifying an active realtime subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// An active realtime subscription: the handle plus its event receiver.
///
/// Dropping the receiver ends delivery; calling
/// [`RealtimeFeed::unsubscribe`](crate::traits::RealtimeFeed::unsubscribe)
/// with the id removes the registration eagerly.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: tokio::sync::mpsc::UnboundedReceiver<RowEvent>,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the type of adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum AdapterType {
    Gateway,
    FileStore,
    Auth,
    Realtime,
}

// --- Session types ---

/// The signed-in identity issued by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// Explicit session context passed to every authenticated workflow call.
///
/// Created on sign-in, cleared on sign-out. Workflow operations never read
/// ambient global state; authorization checks compare against this context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user: AuthUser,
    pub token: String,
}

impl SessionContext {
    pub fn user_id(&self) -> &str {
        &self.user.id
    }
}

// --- Domain enumerations ---

/// Whether an item was reported lost or found.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Lost,
    Found,
}

/// Lifecycle states of an item report.
///
/// `open -> in_progress -> resolved`; owner-initiated transitions are
/// unrestricted, including backward moves from `resolved`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Open,
    InProgress,
    Resolved,
}

/// Lifecycle states of an ownership claim. `approved` and `rejected` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClaimStatus {
    Pending,
    Approved,
    Rejected,
}

/// The item owner's verdict on a pending claim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ClaimDecision {
    Approved,
    Rejected,
}

impl From<ClaimDecision> for ClaimStatus {
    fn from(decision: ClaimDecision) -> Self {
        match decision {
            ClaimDecision::Approved => ClaimStatus::Approved,
            ClaimDecision::Rejected => ClaimStatus::Rejected,
        }
    }
}

/// Categories of notifications delivered to users.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Message,
    Claim,
}

// --- Domain entities ---

/// A lost or found item report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub status: ItemStatus,
    pub location: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub image_url: Option<String>,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ownership claim on an item, backed by a proof image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemClaim {
    pub id: String,
    pub item_id: String,
    pub claimed_by: String,
    pub claim_date: DateTime<Utc>,
    pub proof_of_ownership: String,
    pub status: ClaimStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An append-only comment on an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub item_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A directed, item-scoped message between two users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub item_id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A notification delivered to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub content: String,
    pub item_id: String,
    #[serde(default)]
    pub actor_id: Option<String>,
    #[serde(deserialize_with = "bool_from_int")]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A user profile, 1:1 with the session identity and lazily created on
/// first profile view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub student_id: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub year_of_study: Option<i64>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Accept both JSON booleans and SQLite-style 0/1 integers.
fn bool_from_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => Ok(b),
        serde_json::Value::Number(n) => Ok(n.as_i64().unwrap_or(0) != 0),
        other => Err(serde::de::Error::custom(format!(
            "expected bool or integer, got {other}"
        ))),
    }
}
