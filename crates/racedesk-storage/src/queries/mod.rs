// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions over a [`crate::Database`].

pub mod bookings;
pub mod clients;
pub mod dialog_logs;
pub mod messages;
pub mod sales;
pub mod sessions;

use chrono::{DateTime, Utc};

/// Fixed-width UTC timestamp so text comparison matches chronological order.
pub(crate) fn utc_text(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

pub(crate) fn parse_utc(text: &str) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e)))
}
