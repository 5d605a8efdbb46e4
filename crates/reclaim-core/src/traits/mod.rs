// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for the Reclaim external collaborators.
//!
//! All adapters extend the [`Adapter`] base trait and use `#[async_trait]`
//! for dynamic dispatch compatibility.

pub mod adapter;
pub mod files;
pub mod gateway;
pub mod realtime;
pub mod session;

// Re-export all traits at the traits module level for convenience.
pub use adapter::Adapter;
pub use files::FileStore;
pub use gateway::DataGateway;
pub use realtime::{RealtimeFeed, RealtimePublisher};
pub use session::SessionProvider;
