// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session provider implementation backed by the data gateway.

pub mod provider;

pub use provider::LocalSessionProvider;
