// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gemini backend for racedesk.
//!
//! Text-only: it receives one flattened prompt and never sees tool
//! declarations, which is why it serves as the fallback.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use racedesk_config::model::GeminiConfig;
use racedesk_core::types::{AdapterType, HealthStatus};
use racedesk_core::{PluginAdapter, RacedeskError, TextBackend, is_configured};

use crate::client::{BACKEND, GeminiClient};
use crate::types::GenerateRequest;

pub struct GeminiBackend {
    client: GeminiClient,
    model: String,
}

impl GeminiBackend {
    /// Builds the backend from `[gemini]`. Fails when no usable API key is configured.
    pub fn new(config: &GeminiConfig) -> Result<Self, RacedeskError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| is_configured(Some(k)))
            .ok_or_else(|| {
                RacedeskError::Config(
                    "Gemini API key not found. Set gemini.api_key in config or GEMINI_API_KEY."
                        .into(),
                )
            })?;
        let client = GeminiClient::new(
            api_key,
            &config.model,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            model: config.model.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl PluginAdapter for GeminiBackend {
    fn name(&self) -> &str {
        BACKEND
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TextBackend for GeminiBackend {
    async fn generate_text(&self, prompt: &str) -> Result<String, RacedeskError> {
        let response = self
            .client
            .generate(&GenerateRequest::single_prompt(prompt))
            .await?;
        let text = response
            .first_text()
            .ok_or_else(|| RacedeskError::backend(BACKEND, None, "response has no candidates"))?;
        if text.trim().is_empty() {
            return Err(RacedeskError::backend(BACKEND, None, "empty reply"));
        }
        Ok(text)
    }
}
