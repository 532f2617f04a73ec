// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Booking domain rules for racedesk.
//!
//! [`BookingService`] validates requests, accounts seats against venue
//! capacity, prices sessions, persists bookings through a
//! [`racedesk_core::CapacityStore`], and synthesizes payment links.

pub mod ids;
pub mod pricing;
pub mod service;

pub use ids::BookingIdGenerator;
pub use pricing::{BookingRules, format_amount, parse_slot};
pub use service::{Availability, BookingConfirmation, BookingService};
