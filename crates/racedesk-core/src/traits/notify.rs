// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound side channels: admin notifications and channel replies.

use async_trait::async_trait;

use crate::error::RacedeskError;

/// Best-effort side channel to the venue's administrators.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify_admin(&self, message: &str) -> Result<(), RacedeskError>;
}

/// Delivers a reply to a user on a messaging channel.
#[async_trait]
pub trait OutboundSender: Send + Sync {
    /// Channel name for logs (`telegram`, `whatsapp`).
    fn channel(&self) -> &str;

    /// Sends `text` to the channel-native `recipient` id.
    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), RacedeskError>;
}
