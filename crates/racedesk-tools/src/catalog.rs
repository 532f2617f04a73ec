// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tool catalog and per-role toolsets.

use std::collections::BTreeMap;

use racedesk_core::Role;
use racedesk_core::types::{ParamKind, ParameterSchema, ToolSpec};
use strum::IntoEnumIterator;

/// Every tool a model can be offered, under its wire name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::EnumString,
    strum::EnumIter, strum::AsRefStr,
)]
pub enum ToolName {
    CheckAvailability,
    GetPrice,
    CreateBooking,
    GeneratePaymentLink,
    #[strum(serialize = "GetSalesDetailTool")]
    GetSalesDetail,
    #[strum(serialize = "GetMarketingStatsTool")]
    GetMarketingStats,
    #[strum(serialize = "GetWeatherTool")]
    GetWeather,
    #[strum(serialize = "GetRevenueByDateRangeTool")]
    GetRevenueByDateRange,
    #[strum(serialize = "GetSalesRecommendationTool")]
    GetSalesRecommendation,
}

impl ToolName {
    /// The profile this tool belongs to.
    pub fn role(self) -> Role {
        match self {
            ToolName::CheckAvailability
            | ToolName::GetPrice
            | ToolName::CreateBooking
            | ToolName::GeneratePaymentLink => Role::Client,
            _ => Role::Admin,
        }
    }

    pub fn spec(self) -> ToolSpec {
        let (description, parameters) = match self {
            ToolName::CheckAvailability => (
                "Check whether the requested number of seats is free at a date and time.",
                Some(
                    ParameterSchema::new()
                        .param("date", ParamKind::String, "Date, YYYY-MM-DD", true)
                        .param("time", ParamKind::String, "Start time, HH:MM", true)
                        .param("seats", ParamKind::Integer, "Number of seats", true),
                ),
            ),
            ToolName::GetPrice => (
                "Calculate the price of a booking.",
                Some(
                    ParameterSchema::new()
                        .param("seats", ParamKind::Integer, "Number of seats", true)
                        .param("hours", ParamKind::Integer, "Number of hours", true)
                        .param("time", ParamKind::String, "Start time, HH:MM (optional)", false),
                ),
            ),
            ToolName::CreateBooking => (
                "Create a booking for the client.",
                Some(
                    ParameterSchema::new()
                        .param("date", ParamKind::String, "Date, YYYY-MM-DD", true)
                        .param("time", ParamKind::String, "Start time, HH:MM", true)
                        .param("seats", ParamKind::Integer, "Number of seats", true)
                        .param("hours", ParamKind::Integer, "Number of hours", true),
                ),
            ),
            ToolName::GeneratePaymentLink => (
                "Generate a payment link for a booking.",
                Some(
                    ParameterSchema::new()
                        .param("amount", ParamKind::Number, "Amount to pay", true)
                        .param("bookingID", ParamKind::String, "Booking id", true),
                ),
            ),
            ToolName::GetSalesDetail => (
                "Detailed sales analytics for a filter.",
                Some(ParameterSchema::new().param(
                    "filters",
                    ParamKind::String,
                    "today | last30",
                    true,
                )),
            ),
            ToolName::GetMarketingStats => ("Marketing channel statistics.", None),
            ToolName::GetWeather => (
                "Current weather or forecast at the venue.",
                Some(ParameterSchema::new().param("date", ParamKind::String, "YYYY-MM-DD or today", true)),
            ),
            ToolName::GetRevenueByDateRange => (
                "Revenue analytics for a date range.",
                Some(
                    ParameterSchema::new()
                        .param("start_date", ParamKind::String, "First day, YYYY-MM-DD", true)
                        .param("end_date", ParamKind::String, "Last day, YYYY-MM-DD", true),
                ),
            ),
            ToolName::GetSalesRecommendation => (
                "Sales recommendation combining yesterday's revenue with today's weather.",
                Some(ParameterSchema::new().param(
                    "reason",
                    ParamKind::String,
                    "Why the recommendation is requested (optional)",
                    false,
                )),
            ),
        };

        ToolSpec {
            name: self.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

/// The tools visible under one role, indexed by wire name.
#[derive(Debug, Clone)]
pub struct Toolset {
    tools: BTreeMap<String, ToolName>,
}

impl Toolset {
    pub fn for_role(role: Role) -> Self {
        Self {
            tools: ToolName::iter()
                .filter(|t| t.role() == role)
                .map(|t| (t.to_string(), t))
                .collect(),
        }
    }

    /// Resolves a wire name. Tools from another profile are not found.
    pub fn get(&self, name: &str) -> Option<ToolName> {
        self.tools.get(name).copied()
    }

    /// Declarations to offer the model, sorted by name.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.values().map(|t| t.spec()).collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
