// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use reclaim_core::types::{from_row, to_row};
use reclaim_core::{Collection, DataGateway, Filter, Message, Query, ReclaimError};

pub async fn insert(gateway: &dyn DataGateway, message: &Message) -> Result<(), ReclaimError> {
    gateway
        .insert(Collection::Messages, vec![to_row(message)?])
        .await?;
    Ok(())
}

/// Messages on an item involving `user_id` as sender or recipient, oldest
/// first. Third parties never see a conversation they are not part of.
pub async fn for_item_participant(
    gateway: &dyn DataGateway,
    item_id: &str,
    user_id: &str,
) -> Result<Vec<Message>, ReclaimError> {
    let rows = gateway
        .select(
            Query::new(Collection::Messages)
                .filter(Filter::eq("item_id", item_id))
                .order_asc("created_at"),
        )
        .await?;
    let mut messages = Vec::new();
    for row in rows {
        let message: Message = from_row(row)?;
        if message.sender_id == user_id || message.recipient_id == user_id {
            messages.push(message);
        }
    }
    Ok(messages)
}
