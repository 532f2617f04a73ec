// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp replies via Wazzup.
//!
//! Only the logging side exists: replies are recorded, not delivered.

use async_trait::async_trait;
use racedesk_config::model::WazzupConfig;
use racedesk_core::{OutboundSender, RacedeskError, is_configured};
use tracing::{info, warn};

pub struct WazzupSender {
    enabled: bool,
}

impl WazzupSender {
    pub fn new(config: &WazzupConfig) -> Self {
        Self {
            enabled: is_configured(config.api_key.as_deref()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[async_trait]
impl OutboundSender for WazzupSender {
    fn channel(&self) -> &str {
        "whatsapp"
    }

    async fn send_text(&self, recipient: &str, text: &str) -> Result<(), RacedeskError> {
        if !self.enabled {
            warn!(recipient, "wazzup api key not set, reply dropped");
            return Ok(());
        }
        info!(recipient, chars = text.chars().count(), reply = text, "whatsapp reply");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sending_never_fails() {
        let disabled = WazzupSender::new(&WazzupConfig::default());
        assert!(!disabled.is_enabled());
        disabled.send_text("7701", "hi").await.unwrap();

        let enabled = WazzupSender::new(&WazzupConfig {
            api_key: Some("wz-live".into()),
        });
        assert!(enabled.is_enabled());
        enabled.send_text("7701", "hi").await.unwrap();
    }
}
