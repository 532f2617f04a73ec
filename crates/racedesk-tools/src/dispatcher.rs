// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Routes model tool calls to the booking service and analytics sources.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use racedesk_booking::BookingService;
use racedesk_core::types::{ToolCallRequest, ToolSpec};
use racedesk_core::{AnalyticsRepository, RacedeskError, Role, Stores, WeatherProvider};
use tracing::{debug, info, warn};

use crate::analytics::{
    MARKETING_SNAPSHOT, format_recommendation, format_revenue, format_sales_detail, format_weather,
};
use crate::args::ToolCall;
use crate::catalog::Toolset;

/// Result of one tool invocation, fed back to the model as an observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub content: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            content: format!("Error: {message}"),
            is_error: true,
        }
    }
}

/// What the orchestrator needs from the tool layer.
///
/// `run_tool` never fails: every problem comes back as an error observation.
#[async_trait]
pub trait ToolRunner: Send + Sync {
    /// Declarations offered to the model under `role`.
    fn tool_specs(&self, role: Role) -> Vec<ToolSpec>;

    async fn run_tool(&self, role: Role, client_id: &str, call: &ToolCallRequest) -> ToolOutput;
}

/// The production [`ToolRunner`].
pub struct ToolDispatcher {
    booking: Arc<BookingService>,
    stores: Stores,
    weather: Arc<dyn WeatherProvider>,
    client_tools: Toolset,
    admin_tools: Toolset,
}

impl ToolDispatcher {
    pub fn new(
        booking: Arc<BookingService>,
        stores: Stores,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self {
            booking,
            stores,
            weather,
            client_tools: Toolset::for_role(Role::Client),
            admin_tools: Toolset::for_role(Role::Admin),
        }
    }

    pub fn toolset(&self, role: Role) -> &Toolset {
        match role {
            Role::Client => &self.client_tools,
            Role::Admin => &self.admin_tools,
        }
    }

    async fn execute(&self, client_id: &str, call: ToolCall) -> Result<String, RacedeskError> {
        match call {
            ToolCall::CheckAvailability { date, time, seats } => Ok(self
                .booking
                .check_availability(&date, &time, seats)
                .await?
                .to_string()),
            ToolCall::GetPrice { seats, hours, time } => self.booking.get_price(seats, hours, &time),
            ToolCall::CreateBooking {
                date,
                time,
                seats,
                hours,
            } => {
                let confirmation = self
                    .booking
                    .create_booking(client_id, &date, &time, seats, hours)
                    .await?;
                if let Err(e) = self
                    .stores
                    .context
                    .create_or_update_session(client_id, Some(&confirmation.booking_id))
                    .await
                {
                    warn!(client_id, error = %e, "failed to link session to booking");
                }
                Ok(format!(
                    "Booking created: {}. Price: {}.",
                    confirmation.booking_id, confirmation.price
                ))
            }
            ToolCall::GeneratePaymentLink { amount, booking_id } => {
                self.booking.generate_payment_link(amount, &booking_id)
            }
            ToolCall::GetSalesDetail { filters } => {
                let detail = self.analytics()?.get_sales_detail(&filters).await?;
                Ok(format_sales_detail(&detail))
            }
            ToolCall::GetMarketingStats => Ok(MARKETING_SNAPSHOT.to_string()),
            ToolCall::GetWeather { date } => self.weather_line(&date).await,
            ToolCall::GetRevenueByDateRange {
                start_date,
                end_date,
            } => {
                let start = parse_date(&start_date)?;
                let end = parse_date(&end_date)?;
                self.revenue_line(start, end).await
            }
            ToolCall::GetSalesRecommendation { reason } => {
                debug!(reason = %reason, "sales recommendation requested");
                Ok(self.recommendation().await)
            }
        }
    }

    fn analytics(&self) -> Result<&Arc<dyn AnalyticsRepository>, RacedeskError> {
        self.stores
            .analytics
            .as_ref()
            .ok_or_else(|| RacedeskError::Internal("analytics repository is not available".into()))
    }

    async fn weather_line(&self, date: &str) -> Result<String, RacedeskError> {
        let weather = if date.is_empty() || date.eq_ignore_ascii_case("today") {
            self.weather.get_current_weather().await?
        } else {
            self.weather.get_forecast(date).await?
        };
        Ok(format_weather(&weather))
    }

    async fn revenue_line(&self, start: NaiveDate, end: NaiveDate) -> Result<String, RacedeskError> {
        let report = self.analytics()?.get_sales_report(start, end).await?;
        Ok(format_revenue(start, end, &report))
    }

    /// Yesterday's revenue plus today's weather. Either half degrades to a
    /// placeholder sentence instead of failing the tool.
    async fn recommendation(&self) -> String {
        let today = Local::now().date_naive();
        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);

        let sales = match self.revenue_line(yesterday, yesterday).await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "no revenue data for recommendation");
                "No data for yesterday.".to_string()
            }
        };
        let weather = match self.weather_line("today").await {
            Ok(line) => line,
            Err(e) => {
                warn!(error = %e, "no weather data for recommendation");
                "Weather unavailable.".to_string()
            }
        };
        format_recommendation(yesterday, &sales, &weather)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, RacedeskError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        RacedeskError::Validation(format!("invalid date `{value}`, expected YYYY-MM-DD"))
    })
}

#[async_trait]
impl ToolRunner for ToolDispatcher {
    fn tool_specs(&self, role: Role) -> Vec<ToolSpec> {
        self.toolset(role).specs()
    }

    async fn run_tool(&self, role: Role, client_id: &str, call: &ToolCallRequest) -> ToolOutput {
        let Some(name) = self.toolset(role).get(&call.name) else {
            warn!(client_id, %role, tool = %call.name, "model requested an unknown tool");
            return ToolOutput::error(format_args!("unknown tool '{}'", call.name));
        };

        let typed = ToolCall::coerce(name, &call.arguments);
        info!(client_id, %role, tool = %name, args = ?typed, "dispatching tool");

        match self.execute(client_id, typed).await {
            Ok(content) => ToolOutput::ok(content),
            Err(e) => {
                warn!(client_id, tool = %name, error = %e, "tool failed");
                ToolOutput::error(e)
            }
        }
    }
}
