// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed tool arguments.
//!
//! Models emit loosely typed argument objects: numbers as strings, counts as
//! floats, keys missing altogether. [`ToolCall::coerce`] turns such an object
//! into one strongly typed variant per tool. Missing or mistyped fields become
//! `""` or `0` and are left for the booking rules to reject.

use serde_json::Value;

use crate::catalog::ToolName;

/// A tool invocation with its arguments decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    CheckAvailability {
        date: String,
        time: String,
        seats: i64,
    },
    GetPrice {
        seats: i64,
        hours: i64,
        time: String,
    },
    CreateBooking {
        date: String,
        time: String,
        seats: i64,
        hours: i64,
    },
    GeneratePaymentLink {
        amount: f64,
        booking_id: String,
    },
    GetSalesDetail {
        filters: String,
    },
    GetMarketingStats,
    GetWeather {
        date: String,
    },
    GetRevenueByDateRange {
        start_date: String,
        end_date: String,
    },
    GetSalesRecommendation {
        reason: String,
    },
}

impl ToolCall {
    pub fn coerce(name: ToolName, arguments: &Value) -> Self {
        let args = Args(arguments);
        match name {
            ToolName::CheckAvailability => ToolCall::CheckAvailability {
                date: args.string("date"),
                time: args.string("time"),
                seats: args.integer("seats"),
            },
            ToolName::GetPrice => ToolCall::GetPrice {
                seats: args.integer("seats"),
                hours: args.integer("hours"),
                time: args.string("time"),
            },
            ToolName::CreateBooking => ToolCall::CreateBooking {
                date: args.string("date"),
                time: args.string("time"),
                seats: args.integer("seats"),
                hours: args.integer("hours"),
            },
            ToolName::GeneratePaymentLink => ToolCall::GeneratePaymentLink {
                amount: args.number("amount"),
                booking_id: args.string("bookingID"),
            },
            ToolName::GetSalesDetail => ToolCall::GetSalesDetail {
                filters: args.string("filters"),
            },
            ToolName::GetMarketingStats => ToolCall::GetMarketingStats,
            ToolName::GetWeather => ToolCall::GetWeather {
                date: args.string("date"),
            },
            ToolName::GetRevenueByDateRange => ToolCall::GetRevenueByDateRange {
                start_date: args.string("start_date"),
                end_date: args.string("end_date"),
            },
            ToolName::GetSalesRecommendation => ToolCall::GetSalesRecommendation {
                reason: args.string("reason"),
            },
        }
    }
}

/// Lenient field access over a raw argument value.
struct Args<'a>(&'a Value);

impl Args<'_> {
    fn field(&self, key: &str) -> Option<&Value> {
        self.0.as_object()?.get(key)
    }

    /// Strings pass through; numbers and booleans are rendered; anything else is `""`.
    fn string(&self, key: &str) -> String {
        match self.field(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Accepts `2`, `2.0` and `"2"`. Fractions truncate toward zero; anything else is `0`.
    fn integer(&self, key: &str) -> i64 {
        match self.field(key) {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .unwrap_or(0),
            Some(Value::String(s)) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| {
                        s.parse::<f64>()
                            .ok()
                            .filter(|f| f.is_finite())
                            .map(|f| f.trunc() as i64)
                    })
                    .unwrap_or(0)
            }
            _ => 0,
        }
    }

    fn number(&self, key: &str) -> f64 {
        match self.field(key) {
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            _ => 0.0,
        }
    }
}
