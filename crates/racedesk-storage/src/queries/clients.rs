// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client profile rows.

use chrono::Utc;
use racedesk_core::RacedeskError;
use racedesk_core::types::ClientProfile;
use rusqlite::params;

use crate::database::Database;
use crate::queries::utc_text;

/// Returns the profile for `client_id`, inserting the default row on first contact.
///
/// The `history` field is left empty; the store fills it.
pub async fn get_or_create(db: &Database, client_id: &str) -> Result<ClientProfile, RacedeskError> {
    let client_id = client_id.to_string();
    let now = utc_text(Utc::now());
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO clients (client_id, created_at) VALUES (?1, ?2)",
                params![client_id, now],
            )?;
            conn.query_row(
                "SELECT client_id, name, lang, loyalty_level, total_spent
                 FROM clients WHERE client_id = ?1",
                params![client_id],
                |row| {
                    Ok(ClientProfile {
                        client_id: row.get(0)?,
                        name: row.get(1)?,
                        language: row.get(2)?,
                        loyalty_level: row.get(3)?,
                        total_spent: row.get(4)?,
                        history: String::new(),
                    })
                },
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}
