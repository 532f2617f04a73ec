// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the store traits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use tokio::sync::Mutex;

use racedesk_core::types::{
    Booking, BookingDraft, BusinessSettings, ClientProfile, DialogLogEntry, Message, SalesDetail,
    SalesReport, Sender, Session,
};
use racedesk_core::{AnalyticsRepository, CapacityStore, ContextStore, RacedeskError};

#[derive(Default)]
struct State {
    profiles: HashMap<String, ClientProfile>,
    messages: HashMap<String, Vec<Message>>,
    sessions: HashMap<String, Session>,
    bookings: Vec<Booking>,
    logs: Vec<DialogLogEntry>,
    report_queries: Vec<(NaiveDate, NaiveDate)>,
}

/// Thread-safe in-memory store. Write failures can be switched on to
/// exercise best-effort paths.
pub struct MemoryStore {
    state: Mutex<State>,
    fail_writes: AtomicBool,
    sales_report: Mutex<SalesReport>,
    sales_detail: Mutex<Option<SalesDetail>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            fail_writes: AtomicBool::new(false),
            sales_report: Mutex::new(SalesReport::default()),
            sales_detail: Mutex::new(None),
        }
    }

    /// Makes every write fail with a persistence error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Presets the value returned by `get_sales_report`.
    pub async fn set_sales_report(&self, report: SalesReport) {
        *self.sales_report.lock().await = report;
    }

    /// Presets the value returned by `get_sales_detail`.
    pub async fn set_sales_detail(&self, detail: SalesDetail) {
        *self.sales_detail.lock().await = Some(detail);
    }

    /// Inserts a message with an explicit timestamp.
    pub async fn insert_message_at(&self, client_id: &str, sender: Sender, text: &str, at: DateTime<Utc>) {
        self.state
            .lock()
            .await
            .messages
            .entry(client_id.to_string())
            .or_default()
            .push(Message {
                timestamp: at,
                sender,
                text: text.to_string(),
            });
    }

    pub async fn messages(&self, client_id: &str) -> Vec<Message> {
        self.state
            .lock()
            .await
            .messages
            .get(client_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.lock().await.bookings.clone()
    }

    pub async fn logs(&self) -> Vec<DialogLogEntry> {
        self.state.lock().await.logs.clone()
    }

    /// Date ranges passed to `get_sales_report`, in call order.
    pub async fn report_queries(&self) -> Vec<(NaiveDate, NaiveDate)> {
        self.state.lock().await.report_queries.clone()
    }

    fn check_writable(&self) -> Result<(), RacedeskError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(RacedeskError::persistence(std::io::Error::other(
                "memory store write failure",
            )))
        } else {
            Ok(())
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextStore for MemoryStore {
    async fn get_profile(&self, client_id: &str) -> Result<ClientProfile, RacedeskError> {
        let mut state = self.state.lock().await;
        let profile = state
            .profiles
            .entry(client_id.to_string())
            .or_insert_with(|| ClientProfile {
                client_id: client_id.to_string(),
                name: "Client".to_string(),
                language: "ru".to_string(),
                loyalty_level: "Standard".to_string(),
                total_spent: 0.0,
                history: String::new(),
            })
            .clone();
        Ok(profile)
    }

    async fn get_chat_history(
        &self,
        client_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Message>, RacedeskError> {
        Ok(self
            .messages(client_id)
            .await
            .into_iter()
            .filter(|m| m.timestamp >= since)
            .collect())
    }

    async fn save_message(
        &self,
        client_id: &str,
        sender: Sender,
        text: &str,
    ) -> Result<(), RacedeskError> {
        self.check_writable()?;
        self.insert_message_at(client_id, sender, text, Utc::now()).await;
        Ok(())
    }

    async fn create_or_update_session(
        &self,
        client_id: &str,
        booking_id: Option<&str>,
    ) -> Result<(), RacedeskError> {
        self.check_writable()?;
        let now = Utc::now();
        let mut state = self.state.lock().await;
        let session = state
            .sessions
            .entry(client_id.to_string())
            .or_insert_with(|| Session {
                client_id: client_id.to_string(),
                started_at: now,
                expires_at: now,
                booking_id: None,
            });
        session.expires_at = now + Duration::hours(24);
        if let Some(id) = booking_id {
            session.booking_id = Some(id.to_string());
        }
        Ok(())
    }

    async fn get_session(&self, client_id: &str) -> Result<Option<Session>, RacedeskError> {
        Ok(self.state.lock().await.sessions.get(client_id).cloned())
    }

    async fn business_settings(&self) -> Result<BusinessSettings, RacedeskError> {
        Ok(BusinessSettings {
            name: "Team Racing Club".to_string(),
            address: "Astana".to_string(),
            working_hours: "12:00–04:00".to_string(),
        })
    }
}

#[async_trait]
impl CapacityStore for MemoryStore {
    async fn get_bookings_at(&self, start: NaiveDateTime) -> Result<Vec<Booking>, RacedeskError> {
        Ok(self
            .state
            .lock()
            .await
            .bookings
            .iter()
            .filter(|b| b.start == start)
            .cloned()
            .collect())
    }

    async fn save_booking(&self, draft: &BookingDraft) -> Result<(), RacedeskError> {
        self.check_writable()?;
        let amount = draft.amount.parse::<f64>().map_err(|_| {
            RacedeskError::Protocol(format!("booking amount `{}` is not a number", draft.amount))
        })?;
        self.state.lock().await.bookings.push(Booking {
            booking_id: draft.booking_id.clone(),
            client_id: draft.client_id.clone(),
            start: draft.start,
            seats: draft.seats,
            hours: draft.hours,
            amount,
        });
        Ok(())
    }
}

#[async_trait]
impl AnalyticsRepository for MemoryStore {
    async fn get_sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SalesReport, RacedeskError> {
        self.state.lock().await.report_queries.push((start, end));
        Ok(*self.sales_report.lock().await)
    }

    async fn get_sales_detail(&self, filter: &str) -> Result<SalesDetail, RacedeskError> {
        if let Some(detail) = self.sales_detail.lock().await.clone() {
            return Ok(detail);
        }
        let report = *self.sales_report.lock().await;
        Ok(if filter == "today" {
            SalesDetail::Today {
                date: chrono::Local::now().date_naive(),
                total_bookings: 0,
                popular_hour: None,
                four_seat_bookings: 0,
                avg_price_per_seat: 0.0,
            }
        } else {
            SalesDetail::Rolling {
                days: 30,
                total_bookings: report.total_bookings,
                total_revenue: report.total_revenue,
                average_check: report.average_check,
            }
        })
    }

    async fn save_log(&self, entry: &DialogLogEntry) -> Result<(), RacedeskError> {
        self.check_writable()?;
        self.state.lock().await.logs.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn history_respects_since() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store
            .insert_message_at("c", Sender::Client, "old", now - Duration::hours(30))
            .await;
        store.save_message("c", Sender::Bot, "new").await.unwrap();
        let recent = store
            .get_chat_history("c", now - Duration::hours(24))
            .await
            .unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].text, "new");
    }

    #[tokio::test]
    async fn failing_writes_leave_state_untouched() {
        let store = MemoryStore::new();
        store.fail_writes(true);
        assert!(store.save_message("c", Sender::Client, "x").await.is_err());
        assert!(store.messages("c").await.is_empty());
    }
}
