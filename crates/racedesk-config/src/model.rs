// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for racedesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key fails
//! at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level racedesk configuration.
///
/// Every section is optional and defaults to values that run a local,
/// credential-less instance (stub weather, no model backends).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RacedeskConfig {
    /// Orchestrator and logging settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Venue description, capacity and pricing rules.
    #[serde(default)]
    pub business: BusinessConfig,

    /// Primary model backend.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Fallback model backend.
    #[serde(default)]
    pub gemini: GeminiConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub telegram: TelegramConfig,

    #[serde(default)]
    pub wazzup: WazzupConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP listener settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Orchestrator behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name used in logs.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Upper bound on tool round-trips per inbound message.
    #[serde(default = "default_max_tool_steps")]
    pub max_tool_steps: usize,

    /// How far back conversation history is replayed into a tool-capable turn.
    #[serde(default = "default_history_window_hours")]
    pub history_window_hours: u32,

    /// Capacity of the background work queue (analytics logs, outbound sends).
    #[serde(default = "default_background_queue_capacity")]
    pub background_queue_capacity: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            log_level: default_log_level(),
            max_tool_steps: default_max_tool_steps(),
            history_window_hours: default_history_window_hours(),
            background_queue_capacity: default_background_queue_capacity(),
        }
    }
}

fn default_agent_name() -> String {
    "racedesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_tool_steps() -> usize {
    3
}

fn default_history_window_hours() -> u32 {
    24
}

fn default_background_queue_capacity() -> usize {
    256
}

/// Venue description and booking rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BusinessConfig {
    #[serde(default = "default_business_name")]
    pub name: String,

    #[serde(default = "default_address")]
    pub address: String,

    #[serde(default = "default_working_hours")]
    pub working_hours: String,

    /// Total seats available at any one start time.
    #[serde(default = "default_capacity")]
    pub capacity: u32,

    /// Largest party a single booking may hold.
    #[serde(default = "default_max_seats")]
    pub max_seats: u32,

    /// Longest booking, in hours.
    #[serde(default = "default_max_hours")]
    pub max_hours: u32,

    /// Price of one seat for one hour.
    #[serde(default = "default_base_rate")]
    pub base_rate: f64,

    /// Hour of day (0-23) from which the night multiplier applies.
    #[serde(default = "default_night_start_hour")]
    pub night_start_hour: u32,

    #[serde(default = "default_night_multiplier")]
    pub night_multiplier: f64,

    /// Prefix for generated payment links.
    #[serde(default = "default_payment_base_url")]
    pub payment_base_url: String,
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: default_business_name(),
            address: default_address(),
            working_hours: default_working_hours(),
            capacity: default_capacity(),
            max_seats: default_max_seats(),
            max_hours: default_max_hours(),
            base_rate: default_base_rate(),
            night_start_hour: default_night_start_hour(),
            night_multiplier: default_night_multiplier(),
            payment_base_url: default_payment_base_url(),
        }
    }
}

fn default_business_name() -> String {
    "Team Racing Club".to_string()
}

fn default_address() -> String {
    "Astana, Abylai Khan Ave 27/4".to_string()
}

fn default_working_hours() -> String {
    "12:00–04:00".to_string()
}

fn default_capacity() -> u32 {
    6
}

fn default_max_seats() -> u32 {
    6
}

fn default_max_hours() -> u32 {
    12
}

fn default_base_rate() -> f64 {
    2000.0
}

fn default_night_start_hour() -> u32 {
    22
}

fn default_night_multiplier() -> f64 {
    1.25
}

fn default_payment_base_url() -> String {
    "https://pay.example.com/".to_string()
}

/// OpenAI-compatible chat-completions backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct OpenAiConfig {
    /// API key. `None` falls back to `OPENAI_API_KEY`; unset disables the backend.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_openai_model(),
            base_url: default_openai_base_url(),
            timeout_secs: default_backend_timeout_secs(),
        }
    }
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_backend_timeout_secs() -> u64 {
    60
}

/// Gemini text backend.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeminiConfig {
    /// API key. `None` falls back to `GEMINI_API_KEY`; unset disables the backend.
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,

    #[serde(default = "default_backend_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            timeout_secs: default_backend_timeout_secs(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_gemini_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// OpenWeatherMap settings. Without a key the provider serves a stub.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WeatherConfig {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_latitude")]
    pub latitude: f64,

    #[serde(default = "default_longitude")]
    pub longitude: f64,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            latitude: default_latitude(),
            longitude: default_longitude(),
            base_url: default_weather_base_url(),
        }
    }
}

fn default_latitude() -> f64 {
    51.1694
}

fn default_longitude() -> f64 {
    71.4491
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

/// Telegram bot settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API token. `None` falls back to `TELEGRAM_BOT_TOKEN`.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Telegram user ids granted the admin role. Also the recipients of admin notifications.
    #[serde(default)]
    pub admin_ids: Vec<i64>,

    #[serde(default = "default_telegram_api_url")]
    pub api_base_url: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: None,
            admin_ids: Vec::new(),
            api_base_url: default_telegram_api_url(),
        }
    }
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Wazzup (WhatsApp) webhook provider settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WazzupConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// SQLite storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("racedesk").join("racedesk.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("racedesk.db"))
        .to_string_lossy()
        .into_owned()
}

/// HTTP listener for the webhook gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl RacedeskConfig {
    /// Fills unset credentials from their conventional environment variables.
    pub fn apply_env_fallbacks(&mut self) {
        fill_from_env(&mut self.openai.api_key, "OPENAI_API_KEY");
        fill_from_env(&mut self.gemini.api_key, "GEMINI_API_KEY");
        fill_from_env(&mut self.weather.api_key, "OPENWEATHERMAP_API_KEY");
        fill_from_env(&mut self.telegram.bot_token, "TELEGRAM_BOT_TOKEN");
    }
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if slot.as_deref().is_none_or(|s| s.trim().is_empty())
        && let Ok(value) = std::env::var(var)
        && !value.trim().is_empty()
    {
        *slot = Some(value);
    }
}
