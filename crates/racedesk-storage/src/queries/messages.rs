// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat message log.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use racedesk_core::types::{Message, Sender};
use racedesk_core::RacedeskError;
use rusqlite::params;

use crate::database::Database;
use crate::queries::{parse_utc, utc_text};

/// Append a message stamped with `at`.
pub async fn insert_message(
    db: &Database,
    client_id: &str,
    sender: Sender,
    text: &str,
    at: DateTime<Utc>,
) -> Result<(), RacedeskError> {
    let client_id = client_id.to_string();
    let text = text.to_string();
    let at = utc_text(at);
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO messages (client_id, sender, message_text, created_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![client_id, sender.to_string(), text, at],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Messages for `client_id` written at or after `since`, in insertion order.
pub async fn messages_since(
    db: &Database,
    client_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<Message>, RacedeskError> {
    let client_id = client_id.to_string();
    let since = utc_text(since);
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT created_at, sender, message_text
                 FROM messages WHERE client_id = ?1 AND created_at >= ?2
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![client_id, since], |row| {
                let at: String = row.get(0)?;
                let sender: String = row.get(1)?;
                Ok(Message {
                    timestamp: parse_utc(&at)?,
                    sender: Sender::from_str(&sender).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            1,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                    text: row.get(2)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
