// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking rows used for seat accounting.

use chrono::NaiveDateTime;
use racedesk_core::types::{BOOKING_START_FORMAT, Booking};
use racedesk_core::RacedeskError;
use rusqlite::params;

use crate::database::Database;

/// Local-time format of `bookings.created_at`.
pub(crate) const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Insert a booking. `created_at` is local business time.
pub async fn insert_booking(
    db: &Database,
    booking: &Booking,
    created_at: NaiveDateTime,
) -> Result<(), RacedeskError> {
    let booking = booking.clone();
    let created_at = created_at.format(CREATED_AT_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO bookings (booking_id, client_id, booking_start, seats, hours, amount, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    booking.booking_id,
                    booking.client_id,
                    booking.start.format(BOOKING_START_FORMAT).to_string(),
                    booking.seats,
                    booking.hours,
                    booking.amount,
                    created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Bookings whose start is exactly `start`.
pub async fn bookings_at(db: &Database, start: NaiveDateTime) -> Result<Vec<Booking>, RacedeskError> {
    let start_text = start.format(BOOKING_START_FORMAT).to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT booking_id, client_id, seats, hours, amount
                 FROM bookings WHERE booking_start = ?1
                 ORDER BY created_at ASC",
            )?;
            let rows = stmt.query_map(params![start_text], |row| {
                Ok(Booking {
                    booking_id: row.get(0)?,
                    client_id: row.get(1)?,
                    start,
                    seats: row.get(2)?,
                    hours: row.get(3)?,
                    amount: row.get(4)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
