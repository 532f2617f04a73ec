// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the chat-completions endpoint.
//!
//! Handles bearer authentication and a single retry on transient statuses
//! (429, 500, 503).

use std::time::Duration;

use racedesk_core::RacedeskError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, CompletionRequest, CompletionResponse};

pub(crate) const BACKEND: &str = "openai";

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: reqwest::Client,
    model: String,
    endpoint: String,
    max_retries: u32,
}

impl OpenAiClient {
    /// Builds a client for `{base_url}/chat/completions`.
    pub fn new(
        api_key: &str,
        model: String,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, RacedeskError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| RacedeskError::Config(format!("invalid OpenAI API key: {e}")))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RacedeskError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            model,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            max_retries: 1,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends a completion request, retrying once after a second on transient errors.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, RacedeskError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying completion request after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            let response = self
                .client
                .post(&self.endpoint)
                .json(request)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            debug!(status = %status, attempt, "completion response received");

            if status.is_success() {
                let body = response.text().await.map_err(transport_error)?;
                return serde_json::from_str(&body).map_err(|e| RacedeskError::Backend {
                    backend: BACKEND.to_string(),
                    kind: racedesk_core::BackendFailure::Other,
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "OpenAI API error ({}): {}",
                    api_err.error.type_.as_deref().unwrap_or("unknown"),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            let error = RacedeskError::backend(BACKEND, Some(status.as_u16()), message);

            if is_transient_error(status) && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            RacedeskError::backend(BACKEND, None, "completion request failed after retries")
        }))
    }
}

fn transport_error(e: reqwest::Error) -> RacedeskError {
    let message = format!("HTTP request failed: {e}");
    RacedeskError::Backend {
        backend: BACKEND.to_string(),
        kind: if e.is_timeout() {
            racedesk_core::BackendFailure::Unavailable
        } else {
            racedesk_core::BackendFailure::classify(None, &message)
        },
        message,
        source: Some(Box::new(e)),
    }
}

/// Statuses worth one retry.
pub(crate) fn is_transient_error(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 503)
}
