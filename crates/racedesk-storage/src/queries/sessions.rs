// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session upsert and lookup.

use chrono::{DateTime, Duration, Utc};
use racedesk_core::types::Session;
use racedesk_core::RacedeskError;
use rusqlite::params;

use crate::database::Database;
use crate::queries::{parse_utc, utc_text};

/// Sessions expire this long after the last touch.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Insert or refresh the session for `client_id`.
///
/// `started_at` is kept from the first insert. A `None` booking id keeps the existing link.
pub async fn upsert_session(
    db: &Database,
    client_id: &str,
    booking_id: Option<&str>,
    now: DateTime<Utc>,
) -> Result<(), RacedeskError> {
    let client_id = client_id.to_string();
    let booking_id = booking_id.map(str::to_string);
    let started = utc_text(now);
    let expires = utc_text(now + Duration::hours(SESSION_TTL_HOURS));
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO sessions (client_id, started_at, expires_at, booking_id)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(client_id) DO UPDATE SET
                     expires_at = excluded.expires_at,
                     booking_id = COALESCE(excluded.booking_id, sessions.booking_id)",
                params![client_id, started, expires, booking_id],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Get the session for a client.
pub async fn get_session(db: &Database, client_id: &str) -> Result<Option<Session>, RacedeskError> {
    let client_id = client_id.to_string();
    db.connection()
        .call(move |conn| {
            let result = conn.query_row(
                "SELECT client_id, started_at, expires_at, booking_id
                 FROM sessions WHERE client_id = ?1",
                params![client_id],
                |row| {
                    let started: String = row.get(1)?;
                    let expires: String = row.get(2)?;
                    Ok(Session {
                        client_id: row.get(0)?,
                        started_at: parse_utc(&started)?,
                        expires_at: parse_utc(&expires)?,
                        booking_id: row.get(3)?,
                    })
                },
            );
            match result {
                Ok(session) => Ok(Some(session)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(crate::database::map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    #[tokio::test]
    async fn upsert_creates_then_extends() {
        let (db, _dir) = setup_db().await;
        let first = Utc::now() - Duration::hours(5);
        upsert_session(&db, "TG-1", None, first).await.unwrap();

        let later = Utc::now();
        upsert_session(&db, "TG-1", None, later).await.unwrap();

        let session = get_session(&db, "TG-1").await.unwrap().unwrap();
        assert_eq!(utc_text(session.started_at), utc_text(first));
        assert_eq!(
            utc_text(session.expires_at),
            utc_text(later + Duration::hours(SESSION_TTL_HOURS))
        );
        assert!(session.booking_id.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn booking_link_survives_plain_touch() {
        let (db, _dir) = setup_db().await;
        upsert_session(&db, "WA-3", Some("bk_1"), Utc::now()).await.unwrap();
        upsert_session(&db, "WA-3", None, Utc::now()).await.unwrap();
        let session = get_session(&db, "WA-3").await.unwrap().unwrap();
        assert_eq!(session.booking_id.as_deref(), Some("bk_1"));

        upsert_session(&db, "WA-3", Some("bk_2"), Utc::now()).await.unwrap();
        let session = get_session(&db, "WA-3").await.unwrap().unwrap();
        assert_eq!(session.booking_id.as_deref(), Some("bk_2"));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn missing_session_is_none() {
        let (db, _dir) = setup_db().await;
        assert!(get_session(&db, "nobody").await.unwrap().is_none());
        db.close().await.unwrap();
    }
}
