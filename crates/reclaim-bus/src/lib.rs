// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process realtime feed and typed domain event bus for Reclaim.
//!
//! Implements the `RealtimeFeed`/`RealtimePublisher` adapter pair from
//! `reclaim-core` for single-process deployments, and carries the workflow's
//! domain events (`ItemResolved`, `ClaimDecided`, `MessagePosted`, ...) on a
//! broadcast channel so side-effect consumers stay decoupled from the state
//! machine.

pub mod events;
pub mod feed;

pub use events::{DomainEvent, Envelope};
pub use feed::EventBus;
