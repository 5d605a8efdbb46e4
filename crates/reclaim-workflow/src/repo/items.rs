// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use reclaim_core::types::{from_row, to_row};
use reclaim_core::{
    Collection, DataGateway, Filter, Item, ItemKind, ItemStatus, Query, ReclaimError,
};

/// Listing filters for the item board.
///
/// Category, kind, and status are pushed down to the gateway as equality
/// filters; the free-text search matches case-insensitively against title,
/// description, and location after the rows come back.
#[derive(Debug, Clone, Default)]
pub struct ItemQuery {
    pub category: Option<String>,
    pub kind: Option<ItemKind>,
    pub status: Option<ItemStatus>,
    pub search: Option<String>,
    pub oldest_first: bool,
}

pub async fn insert(gateway: &dyn DataGateway, item: &Item) -> Result<(), ReclaimError> {
    gateway
        .insert(Collection::Items, vec![to_row(item)?])
        .await?;
    Ok(())
}

pub async fn fetch(gateway: &dyn DataGateway, id: &str) -> Result<Item, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::Items)
                .filter(Filter::eq("id", id))
                .limit(1),
        )
        .await?;
    rows.into_iter()
        .next()
        .map(from_row)
        .transpose()?
        .ok_or_else(|| ReclaimError::NotFound {
            collection: Collection::Items,
            id: id.to_string(),
        })
}

pub async fn update_fields(
    gateway: &dyn DataGateway,
    id: &str,
    patch: reclaim_core::Row,
) -> Result<u64, ReclaimError> {
    gateway
        .update(Collection::Items, patch, vec![Filter::eq("id", id)])
        .await
}

/// Deletes the item only when `owner_id` matches its reporter.
pub async fn delete_owned(
    gateway: &dyn DataGateway,
    id: &str,
    owner_id: &str,
) -> Result<(), ReclaimError> {
    gateway
        .delete(
            Collection::Items,
            vec![Filter::eq("id", id), Filter::eq("user_id", owner_id)],
        )
        .await
}

pub async fn list(
    gateway: &dyn DataGateway,
    query: &ItemQuery,
) -> Result<Vec<Item>, ReclaimError> {
    let mut select = Query::new(Collection::Items);
    if let Some(category) = &query.category {
        select = select.filter(Filter::eq("category", category.clone()));
    }
    if let Some(kind) = query.kind {
        select = select.filter(Filter::eq("type", kind.to_string()));
    }
    if let Some(status) = query.status {
        select = select.filter(Filter::eq("status", status.to_string()));
    }
    select = if query.oldest_first {
        select.order_asc("created_at")
    } else {
        select.order_desc("created_at")
    };

    let mut items = Vec::new();
    for row in gateway.select(select).await? {
        items.push(from_row::<Item>(row)?);
    }

    if let Some(needle) = &query.search {
        let needle = needle.to_lowercase();
        items.retain(|item| {
            item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
                || item.location.to_lowercase().contains(&needle)
        });
    }
    Ok(items)
}
