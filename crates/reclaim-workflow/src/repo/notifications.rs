// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use reclaim_core::types::{from_row, to_row};
use reclaim_core::{Collection, DataGateway, Filter, Notification, Query, ReclaimError};

pub async fn insert(
    gateway: &dyn DataGateway,
    notification: &Notification,
) -> Result<(), ReclaimError> {
    gateway
        .insert(Collection::Notifications, vec![to_row(notification)?])
        .await?;
    Ok(())
}

pub async fn fetch(gateway: &dyn DataGateway, id: &str) -> Result<Notification, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::Notifications)
                .filter(Filter::eq("id", id))
                .limit(1),
        )
        .await?;
    rows.into_iter()
        .next()
        .map(from_row)
        .transpose()?
        .ok_or_else(|| ReclaimError::NotFound {
            collection: Collection::Notifications,
            id: id.to_string(),
        })
}

/// Newest notifications for a user, capped at `limit`.
pub async fn for_user(
    gateway: &dyn DataGateway,
    user_id: &str,
    limit: i64,
) -> Result<Vec<Notification>, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::Notifications)
                .filter(Filter::eq("user_id", user_id))
                .order_desc("created_at")
                .limit(limit),
        )
        .await?;
    rows.into_iter().map(from_row).collect()
}

pub async fn mark_read(gateway: &dyn DataGateway, id: &str) -> Result<(), ReclaimError> {
    let mut patch = reclaim_core::Row::new();
    patch.insert("read".to_string(), serde_json::Value::Bool(true));
    gateway
        .update(Collection::Notifications, patch, vec![Filter::eq("id", id)])
        .await?;
    Ok(())
}
