// SPDX-FileCopyrightText: 2026 Reclaim Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite data gateway and local file store for Reclaim.

pub mod database;
pub mod filestore;
pub mod gateway;
mod migrations;
mod sql;

pub use database::Database;
pub use filestore::LocalFileStore;
pub use gateway::SqliteGateway;
