// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use reclaim_core::types::{from_row, to_row};
use reclaim_core::{Collection, DataGateway, Filter, ItemClaim, Query, ReclaimError};

pub async fn insert(gateway: &dyn DataGateway, claim: &ItemClaim) -> Result<(), ReclaimError> {
    gateway
        .insert(Collection::ItemClaims, vec![to_row(claim)?])
        .await?;
    Ok(())
}

pub async fn fetch(gateway: &dyn DataGateway, id: &str) -> Result<ItemClaim, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::ItemClaims)
                .filter(Filter::eq("id", id))
                .limit(1),
        )
        .await?;
    rows.into_iter()
        .next()
        .map(from_row)
        .transpose()?
        .ok_or_else(|| ReclaimError::NotFound {
            collection: Collection::ItemClaims,
            id: id.to_string(),
        })
}

/// Returns the claim a given user has on an item, if any.
pub async fn claim_for(
    gateway: &dyn DataGateway,
    item_id: &str,
    claimant: &str,
) -> Result<Option<ItemClaim>, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::ItemClaims)
                .filter(Filter::eq("item_id", item_id))
                .filter(Filter::eq("claimed_by", claimant))
                .limit(1),
        )
        .await?;
    rows.into_iter().next().map(from_row).transpose()
}

pub async fn for_item(
    gateway: &dyn DataGateway,
    item_id: &str,
) -> Result<Vec<ItemClaim>, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::ItemClaims)
                .filter(Filter::eq("item_id", item_id))
                .order_desc("created_at"),
        )
        .await?;
    rows.into_iter().map(from_row).collect()
}
