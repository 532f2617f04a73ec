// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weather provider trait.

use async_trait::async_trait;

use crate::error::RacedeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::WeatherData;

/// Source of weather conditions at the venue.
///
/// Implementations return a fixed stub instead of failing when no API key is configured.
#[async_trait]
pub trait WeatherProvider: PluginAdapter {
    async fn get_current_weather(&self) -> Result<WeatherData, RacedeskError>;

    /// Conditions for `date` (`YYYY-MM-DD` or `"today"`).
    async fn get_forecast(&self, date: &str) -> Result<WeatherData, RacedeskError>;
}
