// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types shared by every racedesk crate.

use serde::Serialize;
use strum::{Display, EnumString};
use thiserror::Error;

/// How a model backend failed. Only affects logging, never fallback eligibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "snake_case")]
pub enum BackendFailure {
    /// The account ran out of quota.
    QuotaExceeded,
    /// HTTP 429 or an equivalent throttle message.
    RateLimited,
    /// The service is down, overloaded, or timed out.
    Unavailable,
    /// Anything else (auth, malformed response, empty reply).
    Other,
}

impl BackendFailure {
    /// Classify a failure from an optional HTTP status and the error text.
    pub fn classify(status: Option<u16>, message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("quota") {
            return Self::QuotaExceeded;
        }
        match status {
            Some(429) => return Self::RateLimited,
            Some(500 | 502 | 503 | 504 | 529) => return Self::Unavailable,
            _ => {}
        }
        if lower.contains("429") || lower.contains("rate limit") {
            Self::RateLimited
        } else if lower.contains("unavailable")
            || lower.contains("try again")
            || lower.contains("timeout")
            || lower.contains("timed out")
        {
            Self::Unavailable
        } else {
            Self::Other
        }
    }
}

/// The primary error type used across racedesk trait seams and operations.
#[derive(Debug, Error)]
pub enum RacedeskError {
    /// Configuration errors (invalid TOML, missing credentials, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Business rule rejection: seats/hours out of range, unparsable date or time.
    #[error("{0}")]
    Validation(String),

    /// A model backend failed to produce an answer.
    #[error("{backend} backend error ({kind}): {message}")]
    Backend {
        backend: String,
        kind: BackendFailure,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Storage failure (connection, query, migration).
    #[error("persistence error: {source}")]
    Persistence {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed data crossing a protocol boundary (tool arguments, webhook payloads).
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Non-model external service failure (Telegram, WhatsApp, weather API).
    #[error("channel error: {message}")]
    Channel {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// The request was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RacedeskError {
    /// Builds a backend error, classifying it from the status and message.
    pub fn backend(backend: &str, status: Option<u16>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Backend {
            backend: backend.to_string(),
            kind: BackendFailure::classify(status, &message),
            message,
            source: None,
        }
    }

    /// Wraps any storage-layer error.
    pub fn persistence<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Persistence {
            source: Box::new(err),
        }
    }

    /// Returns the backend failure kind, if this is a backend error.
    pub fn backend_failure(&self) -> Option<BackendFailure> {
        match self {
            Self::Backend { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// True for business-rule rejections.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
