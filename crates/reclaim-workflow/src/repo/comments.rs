// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use reclaim_core::types::{from_row, to_row};
use reclaim_core::{Collection, Comment, DataGateway, Filter, Query, ReclaimError};

pub async fn insert(gateway: &dyn DataGateway, comment: &Comment) -> Result<(), ReclaimError> {
    gateway
        .insert(Collection::Comments, vec![to_row(comment)?])
        .await?;
    Ok(())
}

/// Comments on an item, oldest first.
pub async fn for_item(
    gateway: &dyn DataGateway,
    item_id: &str,
) -> Result<Vec<Comment>, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::Comments)
                .filter(Filter::eq("item_id", item_id))
                .order_asc("created_at"),
        )
        .await?;
    rows.into_iter().map(from_row).collect()
}
