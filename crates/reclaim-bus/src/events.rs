// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed domain events emitted by the workflow.
//!
//! The state machine emits these instead of calling presentation code
//! directly; a notification or UI layer subscribes and reacts. Events are
//! advisory: dropping them loses nothing durable, since every event mirrors
//! a row that already exists in the gateway.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reclaim_core::types::ClaimDecision;

/// A domain event with its emission timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub occurred_at: DateTime<Utc>,
    #[serde(flatten)]
    pub event: DomainEvent,
}

impl Envelope {
    pub fn now(event: DomainEvent) -> Self {
        Self {
            occurred_at: Utc::now(),
            event,
        }
    }
}

/// Events produced by the item lifecycle and claim workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A new item report was created.
    ItemReported { item_id: String, owner_id: String },
    /// An item reached `resolved`, by claim approval or owner action.
    ItemResolved { item_id: String },
    /// A non-owner submitted an ownership claim.
    ClaimSubmitted {
        claim_id: String,
        item_id: String,
        claimed_by: String,
    },
    /// The item owner adjudicated a pending claim.
    ClaimDecided {
        claim_id: String,
        item_id: String,
        decision: ClaimDecision,
    },
    /// A direct message was posted on an item.
    MessagePosted {
        message_id: String,
        item_id: String,
        sender_id: String,
        recipient_id: String,
    },
}
