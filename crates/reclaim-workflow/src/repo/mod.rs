// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed read/write helpers over the generic data gateway, one module per
//! collection.

pub mod claims;
pub mod comments;
pub mod items;
pub mod messages;
pub mod notifications;
pub mod profiles;
