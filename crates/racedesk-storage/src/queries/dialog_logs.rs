// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Analytics dialog log.

use racedesk_core::types::DialogLogEntry;
use racedesk_core::RacedeskError;
use rusqlite::params;

use crate::database::Database;

pub async fn insert_log(db: &Database, entry: &DialogLogEntry) -> Result<(), RacedeskError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO dialog_logs (client_id, timestamp, message_text, intent, lead_source, sentiment)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    entry.client_id,
                    entry.timestamp.to_rfc3339(),
                    entry.message_text,
                    entry.intent,
                    entry.lead_source,
                    entry.sentiment,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Number of log rows for a client.
pub async fn count_for_client(db: &Database, client_id: &str) -> Result<i64, RacedeskError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM dialog_logs WHERE client_id = ?1",
                params![client_id],
                |row| row.get(0),
            )
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn logs_are_counted_per_client() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("t.db").to_str().unwrap())
            .await
            .unwrap();

        insert_log(&db, &DialogLogEntry::for_exchange("WA-1", "price?")).await.unwrap();
        insert_log(&db, &DialogLogEntry::for_exchange("WA-1", "book it")).await.unwrap();
        insert_log(&db, &DialogLogEntry::for_exchange("TG-2", "hi")).await.unwrap();

        assert_eq!(count_for_client(&db, "WA-1").await.unwrap(), 2);
        assert_eq!(count_for_client(&db, "TG-2").await.unwrap(), 1);
        assert_eq!(count_for_client(&db, "none").await.unwrap(), 0);
        db.close().await.unwrap();
    }
}
