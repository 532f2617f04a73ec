// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for `models/{model}:generateContent`.

use std::time::Duration;

use racedesk_core::{BackendFailure, RacedeskError};
use tracing::{debug, warn};

use crate::types::{ApiErrorResponse, GenerateRequest, GenerateResponse};

pub(crate) const BACKEND: &str = "gemini";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    max_retries: u32,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Self, RacedeskError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RacedeskError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            endpoint: format!(
                "{}/models/{model}:generateContent",
                base_url.trim_end_matches('/')
            ),
            max_retries: 1,
        })
    }

    /// Sends one request, retrying once after a second on 429/500/503.
    pub async fn generate(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, RacedeskError> {
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                warn!(attempt, "retrying generateContent after transient error");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }

            // The key travels as a query parameter; never log the full URL.
            let response = self
                .client
                .post(&self.endpoint)
                .query(&[("key", self.api_key.as_str())])
                .json(request)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            debug!(status = %status, attempt, "generateContent response received");

            if status.is_success() {
                let body = response.text().await.map_err(transport_error)?;
                return serde_json::from_str(&body).map_err(|e| RacedeskError::Backend {
                    backend: BACKEND.to_string(),
                    kind: BackendFailure::Other,
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                });
            }

            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(api_err) => format!(
                    "Gemini API error ({}): {}",
                    api_err
                        .error
                        .status
                        .as_deref()
                        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown")),
                    api_err.error.message
                ),
                Err(_) => format!("API returned {status}: {body}"),
            };
            let error = RacedeskError::backend(BACKEND, Some(status.as_u16()), message);

            if matches!(status.as_u16(), 429 | 500 | 503) && attempt < self.max_retries {
                warn!(status = %status, "transient error, will retry");
                last_error = Some(error);
                continue;
            }
            return Err(error);
        }

        Err(last_error.unwrap_or_else(|| {
            RacedeskError::backend(BACKEND, None, "generateContent failed after retries")
        }))
    }
}

fn transport_error(e: reqwest::Error) -> RacedeskError {
    // reqwest includes the URL in its Display; strip it to keep the key out of logs.
    let e = e.without_url();
    let message = format!("HTTP request failed: {e}");
    RacedeskError::Backend {
        backend: BACKEND.to_string(),
        kind: if e.is_timeout() {
            BackendFailure::Unavailable
        } else {
            BackendFailure::classify(None, &message)
        },
        message,
        source: Some(Box::new(e)),
    }
}
