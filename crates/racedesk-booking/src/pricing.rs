// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Range checks, slot parsing and price computation.

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use racedesk_config::model::BusinessConfig;
use racedesk_core::RacedeskError;
use racedesk_core::types::BOOKING_START_FORMAT;

/// Numeric booking rules, taken from `[business]`.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRules {
    pub capacity: u32,
    pub max_seats: u32,
    pub max_hours: u32,
    pub base_rate: f64,
    pub night_start_hour: u32,
    pub night_multiplier: f64,
    pub payment_base_url: String,
}

impl Default for BookingRules {
    fn default() -> Self {
        Self::from(&BusinessConfig::default())
    }
}

impl From<&BusinessConfig> for BookingRules {
    fn from(cfg: &BusinessConfig) -> Self {
        Self {
            capacity: cfg.capacity,
            max_seats: cfg.max_seats,
            max_hours: cfg.max_hours,
            base_rate: cfg.base_rate,
            night_start_hour: cfg.night_start_hour,
            night_multiplier: cfg.night_multiplier,
            payment_base_url: cfg.payment_base_url.clone(),
        }
    }
}

impl BookingRules {
    pub fn check_seats(&self, seats: i64) -> Result<u32, RacedeskError> {
        in_range(seats, self.max_seats).ok_or_else(|| {
            RacedeskError::Validation(format!(
                "seats must be between 1 and {}, got {seats}",
                self.max_seats
            ))
        })
    }

    pub fn check_hours(&self, hours: i64) -> Result<u32, RacedeskError> {
        in_range(hours, self.max_hours).ok_or_else(|| {
            RacedeskError::Validation(format!(
                "hours must be between 1 and {}, got {hours}",
                self.max_hours
            ))
        })
    }

    /// Whether a `HH:MM` start time falls in the night tariff. Unparsable times are day-rate.
    pub fn is_night(&self, time: &str) -> bool {
        NaiveTime::parse_from_str(time.trim(), "%H:%M")
            .map(|t| t.hour() >= self.night_start_hour)
            .unwrap_or(false)
    }

    /// Price for an already range-checked request.
    pub fn price(&self, seats: u32, hours: u32, time: &str) -> f64 {
        let base = self.base_rate * f64::from(seats) * f64::from(hours);
        if self.is_night(time) {
            base * self.night_multiplier
        } else {
            base
        }
    }
}

fn in_range(value: i64, max: u32) -> Option<u32> {
    u32::try_from(value)
        .ok()
        .filter(|v| (1..=max).contains(v))
}

/// Whole-number rendering used for prices and payment amounts.
pub fn format_amount(amount: f64) -> String {
    format!("{amount:.0}")
}

/// Parses a `YYYY-MM-DD` date and `HH:MM` time into the exact booking instant.
pub fn parse_slot(date: &str, time: &str) -> Result<NaiveDateTime, RacedeskError> {
    let text = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&text, BOOKING_START_FORMAT).map_err(|_| {
        RacedeskError::Validation(format!(
            "cannot read date `{date}` and time `{time}`, expected YYYY-MM-DD and HH:MM"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn base_price_is_rate_times_seats_times_hours() {
        let rules = BookingRules::default();
        assert_eq!(rules.price(2, 2, "17:00"), 8000.0);
        assert_eq!(format_amount(rules.price(2, 2, "17:00")), "8000");
    }

    #[test]
    fn night_starts_at_configured_hour() {
        let rules = BookingRules::default();
        assert!(!rules.is_night("21:59"));
        assert!(rules.is_night("22:00"));
        assert!(rules.is_night(" 23:30 "));
        assert!(!rules.is_night("02:00"));
    }

    #[test]
    fn malformed_time_skips_multiplier() {
        let rules = BookingRules::default();
        assert!(!rules.is_night("late"));
        assert!(!rules.is_night(""));
        assert_eq!(rules.price(1, 1, "25:99"), 2000.0);
    }

    #[test]
    fn slot_parsing() {
        let slot = parse_slot("2026-03-14", "17:00").unwrap();
        assert_eq!(slot.to_string(), "2026-03-14 17:00:00");
        assert!(parse_slot("14.03.2026", "17:00").unwrap_err().is_validation());
        assert!(parse_slot("2026-03-14", "5pm").unwrap_err().is_validation());
    }

    #[test]
    fn range_checks() {
        let rules = BookingRules::default();
        assert_eq!(rules.check_seats(6).unwrap(), 6);
        assert!(rules.check_seats(0).is_err());
        assert!(rules.check_seats(7).is_err());
        assert!(rules.check_seats(-1).is_err());
        assert!(rules.check_hours(12).is_ok());
        assert!(rules.check_hours(13).is_err());
    }

    proptest! {
        #[test]
        fn night_price_is_day_price_times_multiplier(seats in 1u32..=6, hours in 1u32..=12) {
            let rules = BookingRules::default();
            let day = rules.price(seats, hours, "21:00");
            let night = rules.price(seats, hours, "23:00");
            prop_assert!((night - day * 1.25).abs() < 1e-9);
        }

        #[test]
        fn out_of_range_seats_are_rejected(seats in prop_oneof![-100i64..=0, 7i64..=1000]) {
            prop_assert!(BookingRules::default().check_seats(seats).unwrap_err().is_validation());
        }

        #[test]
        fn out_of_range_hours_are_rejected(hours in prop_oneof![-100i64..=0, 13i64..=1000]) {
            prop_assert!(BookingRules::default().check_hours(hours).unwrap_err().is_validation());
        }
    }
}
