// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notifier and outbound sender that record messages instead of sending them.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use racedesk_core::{Notifier, OutboundSender, RacedeskError};

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn messages(&self) -> Vec<String> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify_admin(&self, message: &str) -> Result<(), RacedeskError> {
        self.sent.lock().await.push(message.to_string());
        Ok(())
    }
}

/// Records `(recipient, text)` pairs. Can be switched to fail every send.
#[derive(Clone, Default)]
pub struct RecordingSender {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl OutboundSender for RecordingSender {
    fn channel(&self) -> &str {
        "recording"
    }

    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), RacedeskError> {
        if self.fail {
            return Err(RacedeskError::Channel {
                message: "recording sender configured to fail".into(),
                source: None,
            });
        }
        self.sent
            .lock()
            .await
            .push((recipient.to_string(), text.to_string()));
        Ok(())
    }
}
