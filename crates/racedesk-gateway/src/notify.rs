// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin notifier selection.

use std::sync::Arc;

use async_trait::async_trait;
use racedesk_config::model::TelegramConfig;
use racedesk_core::{Notifier, RacedeskError};
use tracing::warn;

use crate::telegram::{TelegramNotifier, TelegramSender};

/// Writes alerts to the log. Used when no Telegram admin can be reached.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify_admin(&self, message: &str) -> Result<(), RacedeskError> {
        warn!(alert = message, "admin notification");
        Ok(())
    }
}

/// Telegram alerts when a bot token and at least one admin id are configured,
/// otherwise [`LogNotifier`].
pub fn admin_notifier(
    config: &TelegramConfig,
    sender: Option<Arc<TelegramSender>>,
) -> Arc<dyn Notifier> {
    match sender {
        Some(sender) if !config.admin_ids.is_empty() => {
            Arc::new(TelegramNotifier::new(sender, config.admin_ids.clone()))
        }
        _ => Arc::new(LogNotifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn log_notifier_always_succeeds() {
        LogNotifier.notify_admin("primary backend down").await.unwrap();
    }

    #[tokio::test]
    async fn falls_back_to_log_without_admins() {
        let sender = Arc::new(TelegramSender::new("http://127.0.0.1:1", "T").unwrap());
        let notifier = admin_notifier(&TelegramConfig::default(), Some(sender));
        // An unreachable Telegram API would fail; the log notifier does not.
        notifier.notify_admin("x").await.unwrap();
    }
}
