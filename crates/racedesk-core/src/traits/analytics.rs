// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sales analytics and dialog-log repository.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::RacedeskError;
use crate::types::{DialogLogEntry, SalesDetail, SalesReport};

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Aggregates bookings made (by local creation date) within `[start, end]`.
    async fn get_sales_report(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<SalesReport, RacedeskError>;

    /// `"today"` yields [`SalesDetail::Today`]; anything else a 30-day aggregate.
    async fn get_sales_detail(&self, filter: &str) -> Result<SalesDetail, RacedeskError>;

    async fn save_log(&self, entry: &DialogLogEntry) -> Result<(), RacedeskError>;
}
