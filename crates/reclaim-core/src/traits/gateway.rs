// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote data gateway trait: generic CRUD over named collections.

use async_trait::async_trait;

use crate::error::ReclaimError;
use crate::traits::adapter::Adapter;
use crate::types::{Collection, Filter, Query, Row, WriteOp};

/// Adapter for the remote data store: table-style CRUD with row-level
/// filtering over the collections in [`Collection`].
///
/// Every write can fail with [`ReclaimError::Remote`]; a failed write is
/// simply not considered to have happened. Multi-row consistency is only
/// available through [`apply`](DataGateway::apply), which executes a batch
/// atomically and aborts when a guarded update matches zero rows.
#[async_trait]
pub trait DataGateway: Adapter {
    /// Reads rows matching the query, in the requested order.
    async fn select(&self, query: Query) -> Result<Vec<Row>, ReclaimError>;

    /// Inserts the given rows and returns them as stored.
    async fn insert(&self, collection: Collection, rows: Vec<Row>) -> Result<Vec<Row>, ReclaimError>;

    /// Applies `patch` to every row matching `filters`. Returns the number
    /// of rows matched.
    async fn update(
        &self,
        collection: Collection,
        patch: Row,
        filters: Vec<Filter>,
    ) -> Result<u64, ReclaimError>;

    /// Deletes every row matching `filters`.
    async fn delete(&self, collection: Collection, filters: Vec<Filter>) -> Result<(), ReclaimError>;

    /// Executes a batch of writes atomically.
    ///
    /// A guarded [`WriteOp::Update`] that matches zero rows aborts the whole
    /// batch with [`ReclaimError::Conflict`] carrying the guard message; no
    /// other op in the batch takes effect.
    async fn apply(&self, ops: Vec<WriteOp>) -> Result<(), ReclaimError>;
}
