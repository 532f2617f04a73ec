// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Primary/fallback model invocation.
//!
//! The primary is a tool-capable [`ChatBackend`]; the fallback is a text-only
//! [`TextBackend`] that receives `system + "\n" + user`. Any primary failure
//! falls through to the fallback; the failure kind only changes what is logged.

use std::sync::Arc;

use racedesk_core::types::{ChatMessage, ChatRequest, ChatTurn, ToolSpec};
use racedesk_core::{BackendFailure, ChatBackend, RacedeskError, TextBackend};
use tracing::{debug, info, warn};

/// Result of a single [`HybridEngine::generate`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub turn: ChatTurn,
    /// False when the reply came from the fallback.
    pub used_primary: bool,
}

/// The pair of model backends, built once and shared by every request.
#[derive(Clone)]
pub struct HybridEngine {
    primary: Option<Arc<dyn ChatBackend>>,
    fallback: Option<Arc<dyn TextBackend>>,
}

impl HybridEngine {
    pub fn new(
        primary: Option<Arc<dyn ChatBackend>>,
        fallback: Option<Arc<dyn TextBackend>>,
    ) -> Self {
        if primary.is_none() {
            warn!("no primary backend configured, fallback-only mode: tools are unavailable");
        }
        if fallback.is_none() {
            warn!("no fallback backend configured");
        }
        Self { primary, fallback }
    }

    pub fn primary(&self) -> Option<&Arc<dyn ChatBackend>> {
        self.primary.as_ref()
    }

    pub fn fallback(&self) -> Option<&Arc<dyn TextBackend>> {
        self.fallback.as_ref()
    }

    /// One model call with `tools` attached for the primary.
    ///
    /// Fails only when both backends fail (or are absent); the error then
    /// names both.
    pub async fn generate(
        &self,
        system: &str,
        user: &str,
        tools: &[ToolSpec],
    ) -> Result<Generation, RacedeskError> {
        let primary_error = match &self.primary {
            Some(primary) => {
                let request = ChatRequest {
                    system: system.to_string(),
                    messages: vec![ChatMessage::User(user.to_string())],
                    tools: tools.to_vec(),
                };
                match primary.chat(&request).await {
                    Ok(turn) => {
                        debug!(backend = primary.name(), "primary answered");
                        return Ok(Generation {
                            turn,
                            used_primary: true,
                        });
                    }
                    Err(e) => {
                        log_primary_failure(primary.name(), &e);
                        e.to_string()
                    }
                }
            }
            None => "not configured".to_string(),
        };

        let Some(fallback) = &self.fallback else {
            return Err(both_failed(
                self.primary_name(),
                "fallback",
                &primary_error,
                "not configured",
                BackendFailure::Other,
            ));
        };

        match fallback.generate_text(&format!("{system}\n{user}")).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(backend = fallback.name(), "reply served by fallback backend");
                Ok(Generation {
                    turn: ChatTurn::text(text),
                    used_primary: false,
                })
            }
            Ok(_) => Err(both_failed(
                self.primary_name(),
                fallback.name(),
                &primary_error,
                "empty reply",
                BackendFailure::Other,
            )),
            Err(e) => Err(both_failed(
                self.primary_name(),
                fallback.name(),
                &primary_error,
                &e.to_string(),
                e.backend_failure().unwrap_or(BackendFailure::Other),
            )),
        }
    }

    /// Continues a multi-turn, tool-calling conversation on the primary.
    /// The fallback cannot take part in a tool loop.
    pub async fn continue_chat(&self, request: &ChatRequest) -> Result<ChatTurn, RacedeskError> {
        let primary = self.primary.as_ref().ok_or_else(|| {
            RacedeskError::backend("primary", None, "no tool-capable backend configured")
        })?;
        primary.chat(request).await
    }

    fn primary_name(&self) -> &str {
        self.primary.as_ref().map_or("primary", |p| p.name())
    }
}

fn log_primary_failure(backend: &str, error: &RacedeskError) {
    match error.backend_failure() {
        Some(
            kind @ (BackendFailure::QuotaExceeded
            | BackendFailure::RateLimited
            | BackendFailure::Unavailable),
        ) => warn!(backend, %kind, error = %error, "primary overloaded, falling back"),
        _ => warn!(backend, error = %error, "primary failed unexpectedly, falling back"),
    }
}

fn both_failed(
    primary: &str,
    fallback: &str,
    primary_error: &str,
    fallback_error: &str,
    kind: BackendFailure,
) -> RacedeskError {
    RacedeskError::Backend {
        backend: format!("{primary}+{fallback}"),
        kind,
        message: format!(
            "both backends failed: {primary}: {primary_error}; {fallback}: {fallback_error}"
        ),
        source: None,
    }
}
