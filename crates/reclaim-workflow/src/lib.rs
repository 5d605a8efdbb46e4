// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Item lifecycle and claim adjudication workflow.

pub mod repo;
pub mod service;
pub mod uploads;

pub use repo::items::ItemQuery;
pub use service::{ItemPatch, LostAndFound, NewItem, ProfilePatch, NOTIFICATION_LIMIT};
