// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-object store trait for proof images, item photos, and avatars.

use async_trait::async_trait;

use crate::error::ReclaimError;
use crate::traits::adapter::Adapter;
use crate::types::Bucket;

/// Adapter for bucket-scoped file-object storage with public URL issuance.
#[async_trait]
pub trait FileStore: Adapter {
    /// Stores `bytes` at `path` inside `bucket`, overwriting any existing object.
    async fn upload(&self, bucket: Bucket, path: &str, bytes: &[u8]) -> Result<(), ReclaimError>;

    /// Returns the publicly reachable URL for an object. Issuing a URL does
    /// not check that the object exists.
    fn public_url(&self, bucket: Bucket, path: &str) -> String;
}
