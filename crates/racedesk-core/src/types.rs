// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain and protocol types shared across racedesk crates.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Date-time format used by booking tools and the capacity store (`YYYY-MM-DD HH:MM`).
pub const BOOKING_START_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but degraded (e.g. running on a stub).
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter behind a [`crate::PluginAdapter`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdapterType {
    Provider,
    Storage,
    Weather,
    Channel,
}

/// Which prompt and toolset profile a conversation runs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
}

impl Role {
    pub fn from_admin_flag(is_admin: bool) -> Self {
        if is_admin { Role::Admin } else { Role::Client }
    }
}

/// Author of a stored chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Client,
    Bot,
}

// --- Conversation context ---

/// Per-client profile, created lazily on first contact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientProfile {
    pub client_id: String,
    pub name: String,
    pub language: String,
    pub loyalty_level: String,
    /// Reserved; only completed bookings would raise it.
    pub total_spent: f64,
    /// JSON excerpt of the recent conversation, `[{time, sender, text}]`.
    pub history: String,
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    pub text: String,
}

/// Liveness and booking-link record for a client.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub client_id: String,
    pub started_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub booking_id: Option<String>,
}

/// Static business description used to render prompts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessSettings {
    pub name: String,
    pub address: String,
    pub working_hours: String,
}

// --- Capacity ---

/// A committed booking. `start` is local business time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub booking_id: String,
    pub client_id: String,
    pub start: NaiveDateTime,
    pub seats: u32,
    pub hours: u32,
    pub amount: f64,
}

/// A booking about to be persisted. The amount arrives as the price string
/// produced by the pricing rules and is parsed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub booking_id: String,
    pub client_id: String,
    pub start: NaiveDateTime,
    pub seats: u32,
    pub hours: u32,
    pub amount: String,
}

// --- Analytics ---

/// Analytics shadow of one processed exchange.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogLogEntry {
    pub client_id: String,
    pub timestamp: DateTime<Utc>,
    pub message_text: String,
    pub intent: String,
    pub lead_source: String,
    pub sentiment: String,
}

impl DialogLogEntry {
    /// Builds the default entry for an exchange: unknown intent, neutral sentiment,
    /// lead source derived from the channel prefix of the client id.
    pub fn for_exchange(client_id: &str, message_text: &str) -> Self {
        let lead_source = if client_id.starts_with("TG-") {
            "telegram"
        } else if client_id.starts_with("WA-") {
            "whatsapp"
        } else {
            "unknown"
        };
        Self {
            client_id: client_id.to_string(),
            timestamp: Utc::now(),
            message_text: message_text.to_string(),
            intent: "unknown".to_string(),
            lead_source: lead_source.to_string(),
            sentiment: "neutral".to_string(),
        }
    }
}

/// Revenue aggregate over a date range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SalesReport {
    pub total_revenue: f64,
    pub total_bookings: i64,
    pub average_check: f64,
}

/// Result of a sales-detail query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "period", rename_all = "snake_case")]
pub enum SalesDetail {
    /// The well-known `"today"` filter.
    Today {
        date: NaiveDate,
        total_bookings: i64,
        popular_hour: Option<String>,
        four_seat_bookings: i64,
        avg_price_per_seat: f64,
    },
    /// Any other filter: a rolling aggregate over the last `days` days.
    Rolling {
        days: u32,
        total_bookings: i64,
        total_revenue: f64,
        average_check: f64,
    },
}

// --- Weather ---

/// Current or forecast conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherData {
    /// Degrees Celsius.
    pub temp: f64,
    pub condition: String,
    /// Metres per second.
    pub wind_speed: f64,
    /// 0.0 to 1.0.
    pub precip_prob: f64,
}

// --- Model protocol ---

/// JSON type of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    String,
    Integer,
    Number,
}

/// One named property of a tool's parameter object.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolParam {
    pub name: String,
    pub kind: ParamKind,
    pub description: String,
}

/// Canonical parameter schema: an object with typed properties and a required subset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterSchema {
    pub properties: Vec<ToolParam>,
    pub required: Vec<String>,
}

impl ParameterSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a property; `required` also records it in the required set.
    pub fn param(mut self, name: &str, kind: ParamKind, description: &str, required: bool) -> Self {
        self.properties.push(ToolParam {
            name: name.to_string(),
            kind,
            description: description.to_string(),
        });
        if required {
            self.required.push(name.to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Description of a callable tool as offered to a model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// `None` for tools that were declared without a schema.
    pub parameters: Option<ParameterSchema>,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallRequest {
    /// Backend-assigned call id, echoed back with the tool result.
    pub id: String,
    pub name: String,
    /// Raw argument object as emitted by the model.
    pub arguments: serde_json::Value,
}

/// One message of a multi-turn model conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatMessage {
    User(String),
    Assistant {
        text: String,
        tool_calls: Vec<ToolCallRequest>,
    },
    ToolResult {
        call_id: String,
        name: String,
        content: String,
    },
}

impl ChatMessage {
    /// Maps a stored message into a conversation turn, preserving the role.
    pub fn from_history(message: &Message) -> Self {
        match message.sender {
            Sender::Client => ChatMessage::User(message.text.clone()),
            Sender::Bot => ChatMessage::Assistant {
                text: message.text.clone(),
                tool_calls: Vec::new(),
            },
        }
    }
}

/// A request to a multi-turn, tool-capable backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<ToolSpec>,
}

/// One model turn: free text, tool directives, or both.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatTurn {
    pub text: String,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ChatTurn {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tool_calls: Vec::new(),
        }
    }

    pub fn tool_call(call: ToolCallRequest) -> Self {
        Self {
            text: String::new(),
            tool_calls: vec![call],
        }
    }

    /// The first pending tool directive of this turn, if any.
    pub fn first_tool_call(&self) -> Option<&ToolCallRequest> {
        self.tool_calls.first()
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Replays this turn into a conversation, keeping only the first directive
    /// so each assistant turn is answered by exactly one tool result.
    pub fn into_assistant_message(self) -> ChatMessage {
        ChatMessage::Assistant {
            text: self.text,
            tool_calls: self.tool_calls.into_iter().take(1).collect(),
        }
    }
}
