// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Availability, pricing, booking creation and payment links.

use std::sync::Arc;

use racedesk_core::types::BookingDraft;
use racedesk_core::{CapacityStore, RacedeskError};
use tracing::{debug, info};

use crate::ids::BookingIdGenerator;
use crate::pricing::{BookingRules, format_amount, parse_slot};

/// Outcome of an availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Availability {
    Available,
    Insufficient,
}

/// A booking that was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    pub booking_id: String,
    pub price: String,
}

/// Business rules over a [`CapacityStore`].
///
/// Counts and durations are taken as `i64` so that whatever the tool layer
/// coerced from model arguments reaches the range checks unchanged.
pub struct BookingService {
    capacity: Arc<dyn CapacityStore>,
    rules: BookingRules,
    ids: BookingIdGenerator,
}

impl BookingService {
    pub fn new(capacity: Arc<dyn CapacityStore>, rules: BookingRules) -> Self {
        Self {
            capacity,
            rules,
            ids: BookingIdGenerator::new(),
        }
    }

    pub fn rules(&self) -> &BookingRules {
        &self.rules
    }

    /// Seats committed at exactly the requested start against venue capacity.
    pub async fn check_availability(
        &self,
        date: &str,
        time: &str,
        seats: i64,
    ) -> Result<Availability, RacedeskError> {
        let seats = self.rules.check_seats(seats)?;
        let start = parse_slot(date, time)?;

        // Exact-instant match only: a 17:00 booking of 3 hours does not block 18:00.
        let used: u32 = self
            .capacity
            .get_bookings_at(start)
            .await?
            .iter()
            .map(|b| b.seats)
            .sum();

        let availability = if used + seats > self.rules.capacity {
            Availability::Insufficient
        } else {
            Availability::Available
        };
        debug!(%start, used, requested = seats, %availability, "availability checked");
        Ok(availability)
    }

    pub fn get_price(&self, seats: i64, hours: i64, time: &str) -> Result<String, RacedeskError> {
        let seats = self.rules.check_seats(seats)?;
        let hours = self.rules.check_hours(hours)?;
        Ok(format_amount(self.rules.price(seats, hours, time)))
    }

    /// Persists a booking and returns its id and price.
    ///
    /// TODO: reserve capacity atomically (check-and-insert in one storage
    /// transaction keyed on the start instant). Today nothing re-checks
    /// availability here, so concurrent or unchecked requests can overbook.
    pub async fn create_booking(
        &self,
        client_id: &str,
        date: &str,
        time: &str,
        seats: i64,
        hours: i64,
    ) -> Result<BookingConfirmation, RacedeskError> {
        let price = self.get_price(seats, hours, time)?;
        let seats = self.rules.check_seats(seats)?;
        let hours = self.rules.check_hours(hours)?;
        let start = parse_slot(date, time)?;

        let draft = BookingDraft {
            booking_id: self.ids.next_id(),
            client_id: client_id.to_string(),
            start,
            seats,
            hours,
            amount: price.clone(),
        };
        self.capacity.save_booking(&draft).await?;

        info!(
            client_id,
            booking_id = %draft.booking_id,
            %start,
            seats,
            hours,
            price = %price,
            "booking created"
        );
        Ok(BookingConfirmation {
            booking_id: draft.booking_id,
            price,
        })
    }

    /// Deterministic payment URL for a booking.
    pub fn generate_payment_link(
        &self,
        amount: f64,
        booking_id: &str,
    ) -> Result<String, RacedeskError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(RacedeskError::Validation(format!(
                "payment amount must be positive, got {amount}"
            )));
        }
        let amount = format_amount(amount);
        let url = reqwest::Url::parse_with_params(
            &self.rules.payment_base_url,
            &[("booking", booking_id), ("amount", amount.as_str())],
        )
        .map_err(|e| {
            RacedeskError::Config(format!(
                "invalid payment_base_url `{}`: {e}",
                self.rules.payment_base_url
            ))
        })?;
        Ok(url.into())
    }
}
