// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime feed traits: row-insert fan-out to interested subscribers.

use crate::types::{Collection, Filter, RowEvent, Subscription, SubscriptionId};

/// Publishing side of the realtime feed.
///
/// The data gateway publishes every successful insert here. Delivery is
/// at-least-once and out-of-band: a writer may observe its own insert both
/// in the direct response and through the feed.
pub trait RealtimePublisher: Send + Sync + 'static {
    fn publish(&self, event: RowEvent);
}

/// Subscribing side of the realtime feed.
pub trait RealtimeFeed: Send + Sync + 'static {
    /// Subscribes to row inserts on `collection`, optionally restricted to
    /// rows matching a single field predicate.
    fn subscribe(&self, collection: Collection, filter: Option<Filter>) -> Subscription;

    /// Removes a subscription registration. Dropping the receiver half of a
    /// [`Subscription`] has the same effect lazily.
    fn unsubscribe(&self, id: SubscriptionId);
}
