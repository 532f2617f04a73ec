// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weather provider returning a preset reading.

use async_trait::async_trait;

use racedesk_core::types::{AdapterType, HealthStatus, WeatherData};
use racedesk_core::{PluginAdapter, RacedeskError, WeatherProvider};

pub struct FixedWeather {
    reading: WeatherData,
}

impl FixedWeather {
    pub fn new(temp: f64, condition: &str, wind_speed: f64, precip_prob: f64) -> Self {
        Self {
            reading: WeatherData {
                temp,
                condition: condition.to_string(),
                wind_speed,
                precip_prob,
            },
        }
    }
}

#[async_trait]
impl PluginAdapter for FixedWeather {
    fn name(&self) -> &str {
        "fixed-weather"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Weather
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl WeatherProvider for FixedWeather {
    async fn get_current_weather(&self) -> Result<WeatherData, RacedeskError> {
        Ok(self.reading.clone())
    }

    /// Same reading, condition prefixed like a real forecast.
    async fn get_forecast(&self, _date: &str) -> Result<WeatherData, RacedeskError> {
        Ok(WeatherData {
            condition: format!("Forecast: {}", self.reading.condition),
            ..self.reading.clone()
        })
    }
}
