// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text rendering for the admin analytics tools.

use chrono::NaiveDate;
use racedesk_core::types::{SalesDetail, SalesReport, WeatherData};

/// Static marketing snapshot; there is no marketing data source yet.
pub const MARKETING_SNAPSHOT: &str =
    "Marketing: Instagram +250 followers in 7 days. WhatsApp to booking conversion: 35%.";

/// Attendance outlook derived from the weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WeatherOutlook {
    Good,
    Poor,
    Hot,
}

impl WeatherOutlook {
    /// Below -10 °C or precipitation probability above 0.5 is poor; above 25 °C is hot.
    pub fn classify(weather: &WeatherData) -> Self {
        if weather.temp < -10.0 || weather.precip_prob > 0.5 {
            WeatherOutlook::Poor
        } else if weather.temp > 25.0 {
            WeatherOutlook::Hot
        } else {
            WeatherOutlook::Good
        }
    }

    pub fn analysis(self) -> &'static str {
        match self {
            WeatherOutlook::Good => "Good weather, steady attendance expected.",
            WeatherOutlook::Poor => "Poor weather, attendance may drop.",
            WeatherOutlook::Hot => "Hot weather, daytime attendance may dip.",
        }
    }
}

pub fn format_weather(weather: &WeatherData) -> String {
    format!(
        "Weather: {:.1}°C, {}, wind {:.1} m/s. Analysis: {}",
        weather.temp,
        weather.condition,
        weather.wind_speed,
        WeatherOutlook::classify(weather).analysis()
    )
}

pub fn format_sales_detail(detail: &SalesDetail) -> String {
    match detail {
        SalesDetail::Today {
            total_bookings: 0, ..
        } => "No sales yet today.".to_string(),
        SalesDetail::Today {
            total_bookings,
            popular_hour,
            four_seat_bookings,
            avg_price_per_seat,
            ..
        } => format!(
            "Today: {total_bookings} bookings. Popular hour: {}. 4-seat bookings: {four_seat_bookings}. \
             Average price per seat: {avg_price_per_seat:.0}.",
            popular_hour.as_deref().unwrap_or("n/a"),
        ),
        SalesDetail::Rolling {
            days,
            total_bookings,
            total_revenue,
            average_check,
        } => format!(
            "{days} days: {total_bookings} bookings, revenue {total_revenue:.0}, average check {average_check:.0}."
        ),
    }
}

pub fn format_revenue(start: NaiveDate, end: NaiveDate, report: &SalesReport) -> String {
    format!(
        "Revenue {start} to {end}: {:.0}, {} bookings, average check {:.0}.",
        report.total_revenue, report.total_bookings, report.average_check
    )
}

/// Joins yesterday's revenue line and today's weather line into one narrative.
pub fn format_recommendation(yesterday: NaiveDate, sales: &str, weather: &str) -> String {
    format!("Combined analytics: sales yesterday ({yesterday}): {sales} Weather today: {weather}")
}
