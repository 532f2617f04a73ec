// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the context, capacity and analytics traits.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::debug;

use racedesk_config::model::{BusinessConfig, StorageConfig};
use racedesk_core::types::{
    AdapterType, Booking, BookingDraft, BusinessSettings, ClientProfile, DialogLogEntry,
    HealthStatus, Message, SalesDetail, SalesReport, Sender, Session,
};
use racedesk_core::{
    AnalyticsRepository, CapacityStore, ContextStore, PluginAdapter, RacedeskError,
};

use crate::database::Database;
use crate::queries;

/// Window of recent messages attached to a profile lookup.
pub const PROFILE_EXCERPT_HOURS: i64 = 2;

/// Length of the rolling window for non-`"today"` sales detail.
pub const ROLLING_SALES_DAYS: u32 = 30;

/// The production store. One instance backs all three store traits.
pub struct SqliteStore {
    db: Database,
    settings: BusinessSettings,
}

impl SqliteStore {
    /// Opens the database at the configured path.
    pub async fn open(
        storage: &StorageConfig,
        business: &BusinessConfig,
    ) -> Result<Self, RacedeskError> {
        let db = Database::open(&storage.database_path).await?;
        debug!(path = %storage.database_path, "SQLite store ready");
        Ok(Self::with_database(db, business))
    }

    pub fn with_database(db: Database, business: &BusinessConfig) -> Self {
        Self {
            db,
            settings: BusinessSettings {
                name: business.name.clone(),
                address: business.address.clone(),
                working_hours: business.working_hours.clone(),
            },
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Checkpoints the WAL before shutdown.
    pub async fn close(&self) -> Result<(), RacedeskError> {
        self.db.close().await
    }

    async fn profile_excerpt(&self, client_id: &str) -> Result<String, RacedeskError> {
        #[derive(Serialize)]
        struct Entry<'a> {
            time: DateTime<Utc>,
            sender: Sender,
            text: &'a str,
        }

        let since = Utc::now() - Duration::hours(PROFILE_EXCERPT_HOURS);
        let messages = queries::messages::messages_since(&self.db, client_id, since).await?;
        let entries: Vec<Entry<'_>> = messages
            .iter()
            .map(|m| Entry {
                time: m.timestamp,
                sender: m.sender,
                text: &m.text,
            })
            .collect();
        serde_json::to_string_pretty(&entries)
            .map_err(|e| RacedeskError::Internal(format!("history excerpt encoding failed: {e}")))
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        self.db
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ContextStore for SqliteStore {
    async fn get_profile(&self, client_id: &str) -> Result<ClientProfile, RacedeskError> {
        let mut profile = queries::clients::get_or_create(&self.db, client_id).await?;
        profile.history = self.profile_excerpt(client_id).await?;
        Ok(profile)
    }

    async fn get_chat_history(
        &self,
        client_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Message>, RacedeskError> {
        queries::messages::messages_since(&self.db, client_id, since).await
    }

    async fn save_message(
        &self,
        client_id: &str,
        sender: Sender,
        text: &str,
    ) -> Result<(), RacedeskError> {
        queries::messages::insert_message(&self.db, client_id, sender, text, Utc::now()).await
    }

    async fn create_or_update_session(
        &self,
        client_id: &str,
        booking_id: Option<&str>,
    ) -> Result<(), RacedeskError> {
        queries::sessions::upsert_session(&self.db, client_id, booking_id, Utc::now()).await
    }

    async fn get_session(&self, client_id: &str) -> Result<Option<Session>, RacedeskError> {
        queries::sessions::get_session(&self.db, client_id).await
    }

    async fn business_settings(&self) -> Result<BusinessSettings, RacedeskError> {
        Ok(self.settings.clone())
    }
}

#[async_trait]
impl CapacityStore for SqliteStore {
    async fn get_bookings_at(&self, start: NaiveDateTime) -> Result<Vec<Booking>, RacedeskError> {
        queries::bookings::bookings_at(&self.db, start).await
    }

    async fn save_booking(&self, draft: &BookingDraft) -> Result<(), RacedeskError> {
        let amount: f64 = draft.amount.trim().parse().map_err(|_| {
            RacedeskError::Protocol(format!("booking amount `{}` is not a number", draft.amount))
        })?;
        let booking = Booking {
            booking_id: draft.booking_id.clone(),
            client_id: draft.client_id.clone(),
            start: draft.start,
            seats: draft.seats,
            hours: draft.hours,
            amount,
        };
        queries::bookings::insert_booking(&self.db, &booking, Local::now().naive_local()).await
    }
}

#[async_trait]
impl AnalyticsRepository for SqliteStore {
    async fn get_sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SalesReport, RacedeskError> {
        queries::sales::sales_report(&self.db, start, end).await
    }

    async fn get_sales_detail(&self, filter: &str) -> Result<SalesDetail, RacedeskError> {
        let today = Local::now().date_naive();
        if filter.trim().eq_ignore_ascii_case("today") {
            queries::sales::day_detail(&self.db, today).await
        } else {
            queries::sales::rolling_detail(&self.db, today, ROLLING_SALES_DAYS).await
        }
    }

    async fn save_log(&self, entry: &DialogLogEntry) -> Result<(), RacedeskError> {
        queries::dialog_logs::insert_log(&self.db, entry).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use tempfile::tempdir;

    async fn setup_store() -> (SqliteStore, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let storage = StorageConfig {
            database_path: dir.path().join("store.db").to_string_lossy().into_owned(),
        };
        let store = SqliteStore::open(&storage, &BusinessConfig::default())
            .await
            .unwrap();
        (store, dir)
    }

    fn slot() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 5, 1)
            .unwrap()
            .and_hms_opt(17, 0, 0)
            .unwrap()
    }

    fn draft(id: &str, amount: &str) -> BookingDraft {
        BookingDraft {
            booking_id: id.to_string(),
            client_id: "TG-5".to_string(),
            start: slot(),
            seats: 2,
            hours: 2,
            amount: amount.to_string(),
        }
    }

    #[tokio::test]
    async fn health_check_reports_healthy() {
        let (store, _dir) = setup_store().await;
        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
        assert_eq!(store.adapter_type(), AdapterType::Storage);
    }

    #[tokio::test]
    async fn profile_carries_recent_history_excerpt() {
        let (store, _dir) = setup_store().await;
        store.save_message("TG-5", Sender::Client, "hi").await.unwrap();
        store.save_message("TG-5", Sender::Bot, "hello!").await.unwrap();

        let profile = store.get_profile("TG-5").await.unwrap();
        let excerpt: serde_json::Value = serde_json::from_str(&profile.history).unwrap();
        let entries = excerpt.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["sender"], "client");
        assert_eq!(entries[1]["text"], "hello!");
    }

    #[tokio::test]
    async fn saved_booking_is_found_at_same_instant() {
        let (store, _dir) = setup_store().await;
        store.save_booking(&draft("bk_1", "8000")).await.unwrap();

        let found = store.get_bookings_at(slot()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].amount, 8000.0);
        assert_eq!(found[0].seats, 2);

        let other = store
            .get_bookings_at(slot().with_minute(30).unwrap())
            .await
            .unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn non_numeric_amount_is_rejected_without_writing() {
        let (store, _dir) = setup_store().await;
        let err = store.save_booking(&draft("bk_bad", "eight thousand")).await.unwrap_err();
        assert!(matches!(err, RacedeskError::Protocol(_)));
        assert!(store.get_bookings_at(slot()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn todays_sales_include_new_booking() {
        let (store, _dir) = setup_store().await;
        store.save_booking(&draft("bk_t", "8000")).await.unwrap();

        match store.get_sales_detail("today").await.unwrap() {
            SalesDetail::Today {
                total_bookings,
                popular_hour,
                ..
            } => {
                assert_eq!(total_bookings, 1);
                assert_eq!(popular_hour.as_deref(), Some("17:00"));
            }
            other => panic!("unexpected detail: {other:?}"),
        }
        assert!(matches!(
            store.get_sales_detail("month").await.unwrap(),
            SalesDetail::Rolling { days: 30, total_bookings: 1, .. }
        ));
    }

    #[tokio::test]
    async fn business_settings_come_from_config() {
        let (store, _dir) = setup_store().await;
        let settings = store.business_settings().await.unwrap();
        assert_eq!(settings.name, "Team Racing Club");
    }
}
