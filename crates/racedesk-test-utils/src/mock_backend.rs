// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted model backends for deterministic orchestration tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use racedesk_core::types::{AdapterType, ChatRequest, ChatTurn, HealthStatus, ToolCallRequest};
use racedesk_core::{ChatBackend, PluginAdapter, RacedeskError, TextBackend};

/// Builds a tool directive with a generated call id.
pub fn tool_call(name: &str, arguments: serde_json::Value) -> ChatTurn {
    ChatTurn::tool_call(ToolCallRequest {
        id: format!("call_{name}"),
        name: name.to_string(),
        arguments,
    })
}

type Scripted<T> = Result<T, RacedeskError>;

/// A chat backend that replays queued turns and records every request.
///
/// When the queue runs dry it either repeats a fallback turn (see
/// [`ScriptedChatBackend::repeating`]) or returns "mock response".
pub struct ScriptedChatBackend {
    script: Arc<Mutex<VecDeque<Scripted<ChatTurn>>>>,
    repeat: Option<ChatTurn>,
    fail_with: Option<(u16, String)>,
    requests: Arc<Mutex<Vec<ChatRequest>>>,
    calls: AtomicUsize,
}

impl ScriptedChatBackend {
    pub fn new() -> Self {
        Self::from_script(VecDeque::new())
    }

    fn from_script(script: VecDeque<Scripted<ChatTurn>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            repeat: None,
            fail_with: None,
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Pre-loads successful turns.
    pub fn with_turns(turns: Vec<ChatTurn>) -> Self {
        Self::from_script(turns.into_iter().map(Ok).collect())
    }

    /// Returns `turn` for every call once the script is exhausted.
    pub fn repeating(turn: ChatTurn) -> Self {
        Self {
            repeat: Some(turn),
            ..Self::new()
        }
    }

    /// Fails every call with the given status and message.
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            fail_with: Some((status, message.to_string())),
            ..Self::new()
        }
    }

    pub async fn push_turn(&self, turn: ChatTurn) {
        self.script.lock().await.push_back(Ok(turn));
    }

    pub async fn push_error(&self, err: RacedeskError) {
        self.script.lock().await.push_back(Err(err));
    }

    /// Every request received so far.
    pub async fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().await.clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedChatBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedChatBackend {
    fn name(&self) -> &str {
        "scripted-chat"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatBackend for ScriptedChatBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatTurn, RacedeskError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());
        if let Some((status, message)) = &self.fail_with {
            return Err(RacedeskError::backend("scripted", Some(*status), message.clone()));
        }
        match self.script.lock().await.pop_front() {
            Some(next) => next,
            None => Ok(self
                .repeat
                .clone()
                .unwrap_or_else(|| ChatTurn::text("mock response"))),
        }
    }
}

/// A text backend that replays queued replies and records prompts.
pub struct ScriptedTextBackend {
    script: Arc<Mutex<VecDeque<Scripted<String>>>>,
    fail_with: Option<String>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTextBackend {
    pub fn with_replies(replies: Vec<&str>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                replies.into_iter().map(|r| Ok(r.to_string())).collect(),
            )),
            fail_with: None,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fails every call.
    pub fn failing(message: &str) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fail_with: Some(message.to_string()),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait]
impl PluginAdapter for ScriptedTextBackend {
    fn name(&self) -> &str {
        "scripted-text"
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl TextBackend for ScriptedTextBackend {
    async fn generate_text(&self, prompt: &str) -> Result<String, RacedeskError> {
        self.prompts.lock().await.push(prompt.to_string());
        if let Some(message) = &self.fail_with {
            return Err(RacedeskError::backend("scripted-text", Some(503), message.clone()));
        }
        self.script
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChatRequest {
        ChatRequest {
            system: "sys".into(),
            messages: vec![],
            tools: vec![],
        }
    }

    #[tokio::test]
    async fn replays_turns_in_order_then_defaults() {
        let backend = ScriptedChatBackend::with_turns(vec![
            tool_call("GetPrice", serde_json::json!({"seats": 2})),
            ChatTurn::text("done"),
        ]);
        assert!(backend.chat(&request()).await.unwrap().has_tool_calls());
        assert_eq!(backend.chat(&request()).await.unwrap().text, "done");
        assert_eq!(backend.chat(&request()).await.unwrap().text, "mock response");
        assert_eq!(backend.call_count(), 3);
        assert_eq!(backend.requests().await.len(), 3);
    }

    #[tokio::test]
    async fn failing_backend_keeps_failing() {
        let backend = ScriptedChatBackend::failing(503, "unavailable");
        for _ in 0..5 {
            assert!(backend.chat(&request()).await.is_err());
        }
    }

    #[tokio::test]
    async fn text_backend_records_prompts() {
        let backend = ScriptedTextBackend::with_replies(vec!["hi"]);
        assert_eq!(backend.generate_text("p1").await.unwrap(), "hi");
        assert_eq!(backend.prompts().await, vec!["p1".to_string()]);
    }
}
