// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model backend traits.
//!
//! Two capabilities exist: a multi-turn chat backend with native tool calling
//! (the primary) and a single-prompt text backend (the fallback). Backends are
//! built once at startup and shared as `Arc<dyn ...>` handles.

use async_trait::async_trait;

use crate::error::RacedeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChatRequest, ChatTurn};

/// A tool-capable, multi-turn generative backend.
#[async_trait]
pub trait ChatBackend: PluginAdapter {
    /// Sends the whole conversation and returns the model's next turn.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatTurn, RacedeskError>;
}

/// A text-only generative backend.
#[async_trait]
pub trait TextBackend: PluginAdapter {
    /// Generates a reply for a single flattened prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, RacedeskError>;
}
