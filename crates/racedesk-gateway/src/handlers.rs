// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers: liveness, health and the two chat webhooks.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use racedesk_core::types::{AdapterType, HealthStatus};
use racedesk_core::{OutboundSender, RacedeskError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, error, info, warn};

use crate::server::GatewayState;

/// Sent for Telegram voice notes, which are not transcribed.
pub const VOICE_REPLY: &str = "Sorry, I can't listen to voice messages yet. Please send text.";

/// Sent when processing failed outright.
pub const SERVER_ERROR_REPLY: &str = "Server error. Please try again later.";

// --- Wazzup payloads ---

/// Wazzup webhook body.
#[derive(Debug, Deserialize)]
pub struct WazzupWebhook {
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
    #[serde(default)]
    pub messages: Vec<WazzupMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WazzupMessage {
    #[serde(default)]
    pub text: String,
    #[serde(rename = "chatId", alias = "chatID", default)]
    pub chat_id: String,
    /// `inbound` for client messages; everything else is our own echo.
    #[serde(default)]
    pub direction: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

// --- Telegram payloads ---

/// The subset of a Telegram `Update` the gateway reads.
#[derive(Debug, Deserialize)]
pub struct TelegramUpdate {
    #[serde(default)]
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub from: Option<TelegramUser>,
    pub text: Option<String>,
    pub voice: Option<TelegramVoice>,
}

#[derive(Debug, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct TelegramVoice {
    pub file_id: String,
}

// --- Responses ---

#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every component is healthy, otherwise `degraded`.
    pub status: &'static str,
    pub version: String,
    pub uptime_secs: u64,
    pub components: Vec<ComponentHealth>,
}

#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub kind: AdapterType,
    pub health: HealthStatus,
}

fn ack() -> Response {
    (StatusCode::OK, Json(AckResponse { status: "ok" })).into_response()
}

/// Parses a JSON body, turning syntax and shape errors alike into 400.
fn parse_body<T: DeserializeOwned>(body: &Bytes, source: &str) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        warn!(source, error = %e, "malformed webhook payload");
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: format!("invalid {source} payload: {e}"),
            }),
        )
            .into_response()
    })
}

/// GET /
pub async fn get_root() -> &'static str {
    "racedesk is running"
}

/// GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let mut components = Vec::with_capacity(state.health.components.len());
    for adapter in &state.health.components {
        let health = match adapter.health_check().await {
            Ok(status) => status,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        };
        components.push(ComponentHealth {
            name: adapter.name().to_string(),
            kind: adapter.adapter_type(),
            health,
        });
    }
    let all_healthy = components
        .iter()
        .all(|c| c.health == HealthStatus::Healthy);

    Json(HealthResponse {
        status: if all_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        components,
    })
}

/// POST /webhook/wazzup
///
/// Answers each inbound text message in order; replies leave through the
/// background queue so a slow provider never holds the webhook.
pub async fn post_wazzup(State(state): State<GatewayState>, body: Bytes) -> Response {
    let webhook: WazzupWebhook = match parse_body(&body, "wazzup") {
        Ok(webhook) => webhook,
        Err(rejection) => return rejection,
    };

    for message in webhook.messages {
        if message.direction != "inbound" {
            continue;
        }
        if message.text.trim().is_empty() || message.chat_id.is_empty() {
            debug!(kind = %message.kind, "skipping wazzup message without text");
            continue;
        }

        let client_id = format!("WA-{}", message.chat_id);
        let cancel = state.shutdown.child_token();
        let reply = match state
            .orchestrator
            .process_message_with_cancel(&client_id, &message.text, false, &cancel)
            .await
        {
            Ok(reply) => reply.text,
            Err(RacedeskError::Cancelled) => {
                info!(client_id, "wazzup request cancelled");
                break;
            }
            Err(e) => {
                error!(client_id, error = %e, "failed to process wazzup message");
                SERVER_ERROR_REPLY.to_string()
            }
        };
        debug!(client_id, channel_id = %webhook.channel_id, "queueing whatsapp reply");
        state.orchestrator.background().send_outbound(
            state.whatsapp.clone(),
            &message.chat_id,
            &reply,
        );
    }

    ack()
}

/// POST /webhook/telegram
///
/// Acknowledges at once; the message is processed on its own task.
pub async fn post_telegram(State(state): State<GatewayState>, body: Bytes) -> Response {
    let update: TelegramUpdate = match parse_body(&body, "telegram") {
        Ok(update) => update,
        Err(rejection) => return rejection,
    };
    let Some(message) = update.message else {
        debug!(update_id = update.update_id, "telegram update without message");
        return ack();
    };

    let chat_id = message.chat.id.to_string();
    if message.voice.is_some() {
        info!(chat_id, "voice message, asking for text");
        tokio::spawn(deliver_telegram(state, chat_id, VOICE_REPLY.to_string()));
        return ack();
    }

    let text = message.text.unwrap_or_default();
    if text.trim().is_empty() {
        return ack();
    }
    let is_admin = message
        .from
        .as_ref()
        .is_some_and(|user| state.admin_ids.contains(&user.id));

    tokio::spawn(handle_telegram_message(state, chat_id, text, is_admin));
    ack()
}

async fn handle_telegram_message(state: GatewayState, chat_id: String, text: String, is_admin: bool) {
    if let Some(sender) = &state.telegram
        && let Err(e) = sender.send_typing(&chat_id).await
    {
        debug!(chat_id, error = %e, "typing indicator failed");
    }

    let client_id = format!("TG-{chat_id}");
    let cancel = state.shutdown.child_token();
    let reply = match state
        .orchestrator
        .process_message_with_cancel(&client_id, &text, is_admin, &cancel)
        .await
    {
        Ok(reply) => reply.text,
        Err(RacedeskError::Cancelled) => {
            info!(client_id, "telegram request cancelled");
            return;
        }
        Err(e) => {
            error!(client_id, error = %e, "failed to process telegram message");
            SERVER_ERROR_REPLY.to_string()
        }
    };
    deliver_telegram(state, chat_id, reply).await;
}

async fn deliver_telegram(state: GatewayState, chat_id: String, text: String) {
    match &state.telegram {
        Some(sender) => {
            if let Err(e) = sender.send_text(&chat_id, &text).await {
                error!(chat_id, error = %e, "failed to deliver telegram reply");
            }
        }
        None => warn!(chat_id, reply = %text, "telegram bot token not set, reply not delivered"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wazzup_accepts_both_chat_id_spellings() {
        let a: WazzupWebhook = serde_json::from_str(
            r#"{"channelId":"c1","messages":[{"text":"hi","chatId":"7701","direction":"inbound","type":"text"}]}"#,
        )
        .unwrap();
        let b: WazzupWebhook = serde_json::from_str(
            r#"{"messages":[{"text":"hi","chatID":"7702","direction":"inbound"}]}"#,
        )
        .unwrap();
        assert_eq!(a.channel_id, "c1");
        assert_eq!(a.messages[0].chat_id, "7701");
        assert_eq!(b.messages[0].chat_id, "7702");
    }

    #[test]
    fn telegram_update_with_voice() {
        let update: TelegramUpdate = serde_json::from_str(
            r#"{"update_id":1,"message":{"message_id":5,"chat":{"id":42,"type":"private"},"from":{"id":9,"is_bot":false},"voice":{"file_id":"abc","duration":3}}}"#,
        )
        .unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.voice.unwrap().file_id, "abc");
        assert!(message.text.is_none());
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "degraded",
            version: "0.1.0".into(),
            uptime_secs: 5,
            components: vec![ComponentHealth {
                name: "openweathermap".into(),
                kind: AdapterType::Weather,
                health: HealthStatus::Degraded("stub".into()),
            }],
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["components"][0]["kind"], "weather");
        assert_eq!(json["components"][0]["health"]["status"], "degraded");
    }

    #[test]
    fn malformed_body_is_bad_request() {
        let rejection = parse_body::<TelegramUpdate>(&Bytes::from_static(b"{not json"), "telegram")
            .unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }
}
