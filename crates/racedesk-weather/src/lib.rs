// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Weather at the venue, from OpenWeatherMap.
//!
//! Without an API key the provider serves a fixed stub reading so the admin
//! tools keep working offline.

use std::time::Duration;

use async_trait::async_trait;
use racedesk_config::model::WeatherConfig;
use racedesk_core::types::{AdapterType, HealthStatus, WeatherData};
use racedesk_core::{PluginAdapter, RacedeskError, WeatherProvider, is_configured};
use serde::Deserialize;
use tracing::debug;

/// Precipitation probability reported when the current reading shows rain or snow.
/// The current-weather endpoint carries volumes, not probabilities.
const PRECIP_PRESENT: f64 = 0.2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reading served when no API key is configured.
pub fn stub_weather() -> WeatherData {
    WeatherData {
        temp: -5.0,
        condition: "Cloudy".to_string(),
        wind_speed: 3.2,
        precip_prob: 0.1,
    }
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    main: MainBlock,
    #[serde(default)]
    weather: Vec<ConditionBlock>,
    #[serde(default)]
    wind: Option<WindBlock>,
    #[serde(default)]
    rain: Option<serde::de::IgnoredAny>,
    #[serde(default)]
    snow: Option<serde::de::IgnoredAny>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    main: String,
}

#[derive(Debug, Deserialize)]
struct WindBlock {
    #[serde(default)]
    speed: f64,
}

impl From<CurrentWeather> for WeatherData {
    fn from(raw: CurrentWeather) -> Self {
        let precip_prob = if raw.rain.is_some() || raw.snow.is_some() {
            PRECIP_PRESENT
        } else {
            0.0
        };
        WeatherData {
            temp: raw.main.temp,
            condition: raw
                .weather
                .into_iter()
                .next()
                .map(|c| c.main)
                .unwrap_or_else(|| "Unknown".to_string()),
            wind_speed: raw.wind.map(|w| w.speed).unwrap_or_default(),
            precip_prob,
        }
    }
}

struct Live {
    client: reqwest::Client,
    api_key: String,
}

/// [`WeatherProvider`] backed by the OpenWeatherMap current-weather endpoint.
pub struct OpenWeatherMap {
    live: Option<Live>,
    latitude: f64,
    longitude: f64,
    base_url: String,
}

impl OpenWeatherMap {
    pub fn new(config: &WeatherConfig) -> Result<Self, RacedeskError> {
        let live = match config.api_key.as_deref() {
            Some(key) if is_configured(Some(key)) => Some(Live {
                client: reqwest::Client::builder()
                    .timeout(REQUEST_TIMEOUT)
                    .build()
                    .map_err(|e| {
                        RacedeskError::Config(format!("failed to build HTTP client: {e}"))
                    })?,
                api_key: key.to_string(),
            }),
            _ => None,
        };
        Ok(Self {
            live,
            latitude: config.latitude,
            longitude: config.longitude,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn is_stub(&self) -> bool {
        self.live.is_none()
    }

    async fn fetch(&self, live: &Live) -> Result<WeatherData, RacedeskError> {
        let response = live
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[
                ("lat", self.latitude.to_string()),
                ("lon", self.longitude.to_string()),
                ("appid", live.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| weather_error("weather request failed".into(), Some(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(weather_error(
                format!("weather API returned {status}"),
                None,
            ));
        }
        let raw: CurrentWeather = response
            .json()
            .await
            .map_err(|e| weather_error("malformed weather response".into(), Some(e)))?;
        let data = WeatherData::from(raw);
        debug!(temp = data.temp, condition = %data.condition, "weather fetched");
        Ok(data)
    }
}

fn weather_error(message: String, source: Option<reqwest::Error>) -> RacedeskError {
    RacedeskError::Channel {
        message,
        source: source
            .map(|e| Box::new(e.without_url()) as Box<dyn std::error::Error + Send + Sync>),
    }
}

#[async_trait]
impl PluginAdapter for OpenWeatherMap {
    fn name(&self) -> &str {
        "openweathermap"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Weather
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        Ok(if self.is_stub() {
            HealthStatus::Degraded("no API key, serving stub weather".into())
        } else {
            HealthStatus::Healthy
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherMap {
    async fn get_current_weather(&self) -> Result<WeatherData, RacedeskError> {
        match &self.live {
            Some(live) => self.fetch(live).await,
            None => Ok(stub_weather()),
        }
    }

    /// The free tier has no daily forecast; current conditions stand in for any date.
    async fn get_forecast(&self, date: &str) -> Result<WeatherData, RacedeskError> {
        let mut data = self.get_current_weather().await?;
        debug!(date, "forecast served from current conditions");
        data.condition = format!("Forecast: {}", data.condition);
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn live(base_url: &str) -> OpenWeatherMap {
        OpenWeatherMap::new(&WeatherConfig {
            api_key: Some("owm-key".into()),
            base_url: base_url.to_string(),
            ..WeatherConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn unconfigured_serves_stub() {
        let provider = OpenWeatherMap::new(&WeatherConfig::default()).unwrap();
        assert!(provider.is_stub());
        assert_eq!(provider.get_current_weather().await.unwrap(), stub_weather());
        assert!(matches!(
            provider.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[tokio::test]
    async fn placeholder_key_serves_stub() {
        let provider = OpenWeatherMap::new(&WeatherConfig {
            api_key: Some("your-placeholder-key".into()),
            ..WeatherConfig::default()
        })
        .unwrap();
        assert!(provider.is_stub());
    }

    #[tokio::test]
    async fn parses_current_weather() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .and(query_param("appid", "owm-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 27.4, "humidity": 30},
                "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}],
                "wind": {"speed": 4.1}
            })))
            .mount(&server)
            .await;

        let data = live(&server.uri()).get_current_weather().await.unwrap();
        assert_eq!(data.temp, 27.4);
        assert_eq!(data.condition, "Clear");
        assert_eq!(data.wind_speed, 4.1);
        assert_eq!(data.precip_prob, 0.0);
    }

    #[tokio::test]
    async fn rain_block_sets_precipitation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "main": {"temp": 8.0},
                "weather": [{"main": "Rain"}],
                "wind": {"speed": 2.0},
                "rain": {"1h": 0.8}
            })))
            .mount(&server)
            .await;

        let data = live(&server.uri()).get_forecast("2026-03-14").await.unwrap();
        assert_eq!(data.condition, "Forecast: Rain");
        assert_eq!(data.precip_prob, PRECIP_PRESENT);
    }

    #[tokio::test]
    async fn api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"cod": 401})))
            .mount(&server)
            .await;

        let err = live(&server.uri()).get_current_weather().await.unwrap_err();
        assert!(err.to_string().contains("401"), "got: {err}");
    }
}
