// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use reclaim_core::types::{from_row, to_row};
use reclaim_core::{Collection, DataGateway, Filter, Profile, Query, ReclaimError};

pub async fn fetch(
    gateway: &dyn DataGateway,
    user_id: &str,
) -> Result<Option<Profile>, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::Profiles)
                .filter(Filter::eq("id", user_id))
                .limit(1),
        )
        .await?;
    rows.into_iter().next().map(from_row).transpose()
}

pub async fn insert(gateway: &dyn DataGateway, profile: &Profile) -> Result<(), ReclaimError> {
    gateway
        .insert(Collection::Profiles, vec![to_row(profile)?])
        .await?;
    Ok(())
}

pub async fn update_fields(
    gateway: &dyn DataGateway,
    user_id: &str,
    patch: reclaim_core::Row,
) -> Result<u64, ReclaimError> {
    gateway
        .update(Collection::Profiles, patch, vec![Filter::eq("id", user_id)])
        .await
}
