// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Reclaim lost-and-found service.
//!
//! This crate provides the foundational trait definitions, error types, and
//! domain types used throughout the Reclaim workspace. The external
//! collaborators of the system -- remote data gateway, file-object store,
//! session provider, and realtime feed -- are expressed as adapter traits
//! defined here and implemented elsewhere in the workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ReclaimError;
pub use types::{
    AdapterType, AuthUser, Bucket, ClaimDecision, ClaimStatus, Collection, Comment, Filter,
    HealthStatus, Item, ItemClaim, ItemKind, ItemStatus, Message, Notification, NotificationKind,
    OrderBy, Profile, Query, Row, RowEvent, SessionContext, Subscription, SubscriptionId, WriteOp,
};

// Re-export all adapter traits at crate root.
pub use traits::{Adapter, DataGateway, FileStore, RealtimeFeed, RealtimePublisher, SessionProvider};
