// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context and capacity store traits.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::RacedeskError;
use crate::traits::analytics::AnalyticsRepository;
use crate::types::{Booking, BookingDraft, BusinessSettings, ClientProfile, Message, Sender, Session};

/// Per-client message log, profile and session record.
#[async_trait]
pub trait ContextStore: Send + Sync {
    /// Returns the client's profile, creating a default one on first lookup.
    async fn get_profile(&self, client_id: &str) -> Result<ClientProfile, RacedeskError>;

    /// Messages written at or after `since`, oldest first.
    async fn get_chat_history(
        &self,
        client_id: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<Message>, RacedeskError>;

    /// Appends a message to the client's log.
    async fn save_message(
        &self,
        client_id: &str,
        sender: Sender,
        text: &str,
    ) -> Result<(), RacedeskError>;

    /// Upserts the session keyed on client id, pushing expiry 24 hours out.
    /// `None` keeps any existing booking link.
    async fn create_or_update_session(
        &self,
        client_id: &str,
        booking_id: Option<&str>,
    ) -> Result<(), RacedeskError>;

    async fn get_session(&self, client_id: &str) -> Result<Option<Session>, RacedeskError>;

    async fn business_settings(&self) -> Result<BusinessSettings, RacedeskError>;
}

/// Durable booking records used for seat accounting.
#[async_trait]
pub trait CapacityStore: Send + Sync {
    /// Bookings whose start equals `start` exactly.
    async fn get_bookings_at(&self, start: NaiveDateTime) -> Result<Vec<Booking>, RacedeskError>;

    /// Persists a booking. Fails if the amount string is not numeric.
    async fn save_booking(&self, draft: &BookingDraft) -> Result<(), RacedeskError>;
}

/// The store handles a running system is wired with.
///
/// Analytics is optional: deployments without it still serve clients, and
/// the admin tools report it as unavailable.
#[derive(Clone)]
pub struct Stores {
    pub context: Arc<dyn ContextStore>,
    pub capacity: Arc<dyn CapacityStore>,
    pub analytics: Option<Arc<dyn AnalyticsRepository>>,
}

impl Stores {
    /// Wires every handle to one backing store implementing all three traits.
    pub fn unified<S>(store: Arc<S>) -> Self
    where
        S: ContextStore + CapacityStore + AnalyticsRepository + 'static,
    {
        Self {
            context: store.clone(),
            capacity: store.clone(),
            analytics: Some(store),
        }
    }

    /// Drops the analytics capability.
    pub fn without_analytics(mut self) -> Self {
        self.analytics = None;
        self
    }
}
