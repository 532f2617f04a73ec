// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram Bot API client: replies, typing indicator and admin alerts.

use std::time::Duration;

use async_trait::async_trait;
use racedesk_config::model::TelegramConfig;
use racedesk_core::{Notifier, OutboundSender, RacedeskError, is_configured};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const SEND_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SendChatAction<'a> {
    chat_id: &'a str,
    action: &'a str,
}

/// Envelope of every Bot API response.
#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends messages through `POST {base}/bot{token}/{method}`.
pub struct TelegramSender {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl TelegramSender {
    pub fn new(base_url: &str, token: &str) -> Result<Self, RacedeskError> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| telegram_error("failed to build HTTP client", e))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        })
    }

    /// Builds a sender when a bot token is configured.
    pub fn from_config(config: &TelegramConfig) -> Result<Option<Self>, RacedeskError> {
        match config.bot_token.as_deref() {
            Some(token) if is_configured(Some(token)) => {
                Self::new(&config.api_base_url, token).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Shows "typing..." in the chat.
    pub async fn send_typing(&self, chat_id: &str) -> Result<(), RacedeskError> {
        self.call(
            "sendChatAction",
            &SendChatAction {
                chat_id,
                action: "typing",
            },
        )
        .await
    }

    async fn call<T: Serialize>(&self, method: &str, body: &T) -> Result<(), RacedeskError> {
        let url = format!("{}/bot{}/{method}", self.base_url, self.token);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| telegram_error(&format!("{method} request failed"), e.without_url()))?;

        let status = response.status();
        let parsed: Option<BotApiResponse> = response.json().await.ok();
        match parsed {
            Some(reply) if status.is_success() && reply.ok => {
                debug!(method, "telegram call succeeded");
                Ok(())
            }
            Some(reply) => Err(RacedeskError::Channel {
                message: format!(
                    "telegram {method} rejected ({status}): {}",
                    reply.description.unwrap_or_else(|| "no description".into())
                ),
                source: None,
            }),
            None => Err(RacedeskError::Channel {
                message: format!("telegram {method} returned an unreadable response ({status})"),
                source: None,
            }),
        }
    }
}

#[async_trait]
impl OutboundSender for TelegramSender {
    fn channel(&self) -> &str {
        "telegram"
    }

    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), RacedeskError> {
        self.call(
            "sendMessage",
            &SendMessage {
                chat_id: recipient,
                text,
            },
        )
        .await
    }
}

fn telegram_error(context: &str, e: reqwest::Error) -> RacedeskError {
    RacedeskError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Alerts every configured admin chat.
pub struct TelegramNotifier {
    sender: std::sync::Arc<TelegramSender>,
    admin_ids: Vec<i64>,
}

impl TelegramNotifier {
    pub fn new(sender: std::sync::Arc<TelegramSender>, admin_ids: Vec<i64>) -> Self {
        Self { sender, admin_ids }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify_admin(&self, message: &str) -> Result<(), RacedeskError> {
        let mut failed = 0;
        for admin in &self.admin_ids {
            if let Err(e) = self.sender.send_text(&admin.to_string(), message).await {
                warn!(admin, error = %e, "admin alert not delivered");
                failed += 1;
            }
        }
        if failed > 0 {
            return Err(RacedeskError::Channel {
                message: format!(
                    "admin alert failed for {failed} of {} recipients",
                    self.admin_ids.len()
                ),
                source: None,
            });
        }
        Ok(())
    }
}
