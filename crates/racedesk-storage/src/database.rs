// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and migrations.
//!
//! All statements run on tokio-rusqlite's single background thread; every
//! request task shares the one [`Database`] handle.

use std::path::Path;

use racedesk_core::RacedeskError;
use tracing::debug;

use crate::migrations::run_migrations;

/// Handle to the racedesk SQLite database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and brings its schema up to date.
    pub async fn open(path: &str) -> Result<Self, RacedeskError> {
        if let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(RacedeskError::persistence)?;
        }

        // Migrations run on a short-lived blocking connection before the
        // shared async connection is opened.
        let owned = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), RacedeskError> {
            let mut conn = rusqlite::Connection::open(&owned).map_err(RacedeskError::persistence)?;
            apply_pragmas(&conn).map_err(RacedeskError::persistence)?;
            run_migrations(&mut conn)
        })
        .await
        .map_err(|e| RacedeskError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(RacedeskError::persistence)?;
        conn.call(|conn| -> Result<(), rusqlite::Error> {
            apply_pragmas(conn)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        debug!(path, "database opened");
        Ok(Self { conn })
    }

    /// The shared async connection.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoints the WAL. The connection itself closes when the last handle drops.
    pub async fn close(&self) -> Result<(), RacedeskError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

fn apply_pragmas(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA synchronous = NORMAL;
         PRAGMA foreign_keys = ON;
         PRAGMA busy_timeout = 5000;",
    )
}

/// Convert tokio-rusqlite errors into persistence errors.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> RacedeskError {
    RacedeskError::persistence(e)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn open_creates_file_and_parent_dirs() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested/dir/racedesk.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        assert!(db_path.exists());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn open_on_a_directory_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let err = Database::open(dir.path().to_str().unwrap())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, RacedeskError::Persistence { .. }));
    }

    #[tokio::test]
    async fn reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("twice.db");
        let path = db_path.to_str().unwrap();
        Database::open(path).await.unwrap().close().await.unwrap();
        let db = Database::open(path).await.unwrap();

        let tables: i64 = db
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN
                     ('clients', 'messages', 'bookings', 'sessions', 'dialog_logs')",
                    [],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap();
        assert_eq!(tables, 5);
    }
}
