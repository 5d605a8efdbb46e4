// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process realtime feed: row-insert fan-out with per-field predicates.
//!
//! The SQLite gateway publishes every successful insert here; subscribers
//! receive events for their collection whose rows match an optional field
//! predicate. Delivery is at-least-once and out-of-band -- a writer sees its
//! own inserts through the feed as well as in the direct response.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

use reclaim_core::{
    Adapter, AdapterType, Collection, Filter, HealthStatus, RealtimeFeed, RealtimePublisher,
    ReclaimError, RowEvent, Subscription, SubscriptionId,
};

use crate::events::Envelope;

/// Buffered domain events per subscriber before lagging drops the oldest.
const DOMAIN_CHANNEL_CAPACITY: usize = 256;

struct FeedSubscriber {
    collection: Collection,
    filter: Option<Filter>,
    tx: mpsc::UnboundedSender<RowEvent>,
}

/// The in-process event bus: realtime row-insert feed plus a broadcast
/// channel for typed domain events.
pub struct EventBus {
    subscribers: Mutex<HashMap<u64, FeedSubscriber>>,
    next_id: AtomicU64,
    domain_tx: broadcast::Sender<Envelope>,
}

impl EventBus {
    pub fn new() -> Self {
        let (domain_tx, _) = broadcast::channel(DOMAIN_CHANNEL_CAPACITY);
        Self {
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            domain_tx,
        }
    }

    /// Opens a receiver for workflow domain events.
    pub fn subscribe_domain(&self) -> broadcast::Receiver<Envelope> {
        self.domain_tx.subscribe()
    }

    /// Emits a domain event to all current subscribers.
    ///
    /// Events to an audience of zero are dropped silently; the bus carries
    /// no durable state.
    pub fn emit(&self, envelope: Envelope) {
        debug!(event = ?envelope.event, "domain event");
        let _ = self.domain_tx.send(envelope);
    }

    /// A panic while holding the lock cannot leave the map mid-update, so a
    /// poisoned guard is safe to reclaim rather than propagate.
    fn subscribers(&self) -> MutexGuard<'_, HashMap<u64, FeedSubscriber>> {
        self.subscribers.lock().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    fn active_subscribers(&self) -> usize {
        self.subscribers().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl RealtimeFeed for EventBus {
    fn subscribe(&self, collection: Collection, filter: Option<Filter>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers().insert(
            id,
            FeedSubscriber {
                collection,
                filter,
                tx,
            },
        );
        debug!(id, %collection, "realtime subscription opened");
        Subscription {
            id: SubscriptionId(id),
            events: rx,
        }
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let removed = self.subscribers().remove(&id.0);
        if removed.is_some() {
            debug!(id = id.0, "realtime subscription closed");
        }
    }
}

impl RealtimePublisher for EventBus {
    fn publish(&self, event: RowEvent) {
        let mut subscribers = self.subscribers();
        // Closed receivers are pruned on the next publish touching them.
        subscribers.retain(|_, sub| {
            if sub.collection != event.collection {
                return !sub.tx.is_closed();
            }
            if let Some(filter) = &sub.filter {
                if !filter.matches(&event.row) {
                    return !sub.tx.is_closed();
                }
            }
            sub.tx.send(event.clone()).is_ok()
        });
    }
}

#[async_trait]
impl Adapter for EventBus {
    fn name(&self) -> &str {
        "in-process"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Realtime
    }

    async fn health_check(&self) -> Result<HealthStatus, ReclaimError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ReclaimError> {
        let mut subscribers = self.subscribers();
        let count = subscribers.len();
        subscribers.clear();
        debug!(count, "event bus shut down, subscriptions dropped");
        Ok(())
    }
}
