// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for racedesk.
//!
//! WAL-mode SQLite with embedded migrations, one shared `tokio-rusqlite`
//! connection, and typed queries for clients, messages, sessions, bookings,
//! sales aggregates and the dialog log.

pub mod database;
pub mod migrations;
pub mod queries;
pub mod store;

pub use database::Database;
pub use store::SqliteStore;
