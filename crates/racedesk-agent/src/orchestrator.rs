// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message processing pipeline.
//!
//! Each inbound message moves through [`ConversationState`]:
//! `Received -> QuickAnswered | ToolLoop -> Done`. The quick path is one
//! model call with the role's tools attached. A tool directive switches to
//! the bounded tool loop on the primary backend, replaying recent history.

use std::future::Future;
use std::sync::Arc;

use chrono::{Local, TimeDelta, Utc};
use racedesk_config::model::AgentConfig;
use racedesk_core::types::{
    BusinessSettings, ChatMessage, ChatRequest, ChatTurn, ClientProfile, DialogLogEntry,
};
use racedesk_core::{ContextStore, RacedeskError, Role, Sender};
use racedesk_tools::ToolRunner;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::background::BackgroundQueue;
use crate::engine::HybridEngine;
use crate::prompts::{self, CONTINUATION_REPLY, OVERLOAD_REPLY, TECHNICAL_REPLY};

/// Where a message is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    /// Persisted, waiting for the first model call.
    Received,
    /// The first model call produced the final text.
    QuickAnswered,
    /// Tool directives are being executed and fed back.
    ToolLoop,
    /// A reply was produced by the tool loop or a fallback reply.
    Done,
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConversationState::Received => write!(f, "received"),
            ConversationState::QuickAnswered => write!(f, "quick_answered"),
            ConversationState::ToolLoop => write!(f, "tool_loop"),
            ConversationState::Done => write!(f, "done"),
        }
    }
}

/// The outcome of one processed message.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    /// Terminal state: [`ConversationState::QuickAnswered`] or [`ConversationState::Done`].
    pub state: ConversationState,
    /// False when the first model call was served by the fallback.
    pub used_primary: bool,
    /// Tools dispatched while producing this reply.
    pub tool_steps: usize,
}

/// Drives the model backends and tools for every inbound message.
///
/// Holds only shared, immutable handles; one instance serves all requests.
pub struct Orchestrator {
    engine: HybridEngine,
    tools: Arc<dyn ToolRunner>,
    context: Arc<dyn ContextStore>,
    background: BackgroundQueue,
    max_tool_steps: usize,
    history_window: TimeDelta,
}

impl Orchestrator {
    pub fn new(
        engine: HybridEngine,
        tools: Arc<dyn ToolRunner>,
        context: Arc<dyn ContextStore>,
        background: BackgroundQueue,
        config: &AgentConfig,
    ) -> Self {
        Self {
            engine,
            tools,
            context,
            background,
            max_tool_steps: config.max_tool_steps.max(1),
            history_window: TimeDelta::hours(i64::from(config.history_window_hours)),
        }
    }

    pub fn background(&self) -> &BackgroundQueue {
        &self.background
    }

    pub fn engine(&self) -> &HybridEngine {
        &self.engine
    }

    /// Processes one message without an external cancellation signal.
    pub async fn process_message(
        &self,
        client_id: &str,
        text: &str,
        is_admin: bool,
    ) -> Result<Reply, RacedeskError> {
        self.process_message_with_cancel(client_id, text, is_admin, &CancellationToken::new())
            .await
    }

    /// Processes one message, aborting promptly when `cancel` fires.
    ///
    /// Backend and storage failures degrade to a fixed reply; the only error
    /// returned is [`RacedeskError::Cancelled`], in which case no bot reply
    /// has been persisted.
    pub async fn process_message_with_cancel(
        &self,
        client_id: &str,
        text: &str,
        is_admin: bool,
        cancel: &CancellationToken,
    ) -> Result<Reply, RacedeskError> {
        let role = Role::from_admin_flag(is_admin);
        debug!(client_id, %role, state = %ConversationState::Received, "processing message");

        if let Err(e) =
            guard(cancel, self.context.save_message(client_id, Sender::Client, text)).await?
        {
            warn!(client_id, error = %e, "failed to persist inbound message");
        }
        if let Err(e) =
            guard(cancel, self.context.create_or_update_session(client_id, None)).await?
        {
            warn!(client_id, error = %e, "failed to upsert session");
        }

        let system = self.render_prompt(role, client_id, cancel).await?;
        let tools = self.tools.tool_specs(role);

        let generation = match guard(cancel, self.engine.generate(&system, text, &tools)).await? {
            Ok(generation) => generation,
            Err(e) => {
                error!(client_id, error = %e, "no backend could answer");
                self.background
                    .notify_admin(format!("Model backends failed for {client_id}: {e}"));
                return self
                    .finish(client_id, text, OVERLOAD_REPLY, ConversationState::Done, false, 0, cancel)
                    .await;
            }
        };
        let used_primary = generation.used_primary;

        if !generation.turn.has_tool_calls() {
            let (reply, state) = if generation.turn.text.trim().is_empty() {
                (CONTINUATION_REPLY.to_string(), ConversationState::Done)
            } else {
                (generation.turn.text, ConversationState::QuickAnswered)
            };
            return self
                .finish(client_id, text, &reply, state, used_primary, 0, cancel)
                .await;
        }

        debug!(client_id, state = %ConversationState::ToolLoop, "entering tool loop");
        let history = self.load_history(client_id, text, cancel).await?;
        let mut request = ChatRequest {
            system,
            messages: history,
            tools,
        };
        request.messages.push(ChatMessage::User(text.to_string()));

        let mut turn = generation.turn;
        let mut steps = 0;
        while steps < self.max_tool_steps {
            let Some(call) = turn.first_tool_call().cloned() else {
                break;
            };
            steps += 1;
            info!(client_id, tool = %call.name, step = steps, "dispatching tool");

            let output = guard(cancel, self.tools.run_tool(role, client_id, &call)).await?;
            if output.is_error {
                debug!(client_id, tool = %call.name, result = %output.content, "tool reported an error");
            }
            request.messages.push(turn.into_assistant_message());
            request.messages.push(ChatMessage::ToolResult {
                call_id: call.id,
                name: call.name,
                content: output.content,
            });

            turn = match guard(cancel, self.engine.continue_chat(&request)).await? {
                Ok(next) => next,
                Err(e) => {
                    error!(client_id, step = steps, error = %e, "tool loop failed");
                    self.background
                        .notify_admin(format!("Tool loop failed for {client_id}: {e}"));
                    return self
                        .finish(
                            client_id,
                            text,
                            TECHNICAL_REPLY,
                            ConversationState::Done,
                            used_primary,
                            steps,
                            cancel,
                        )
                        .await;
                }
            };
        }

        let reply = final_text(turn);
        if reply == CONTINUATION_REPLY {
            info!(client_id, steps, "tool loop ended without a text answer");
        }
        self.finish(client_id, text, &reply, ConversationState::Done, used_primary, steps, cancel)
            .await
    }

    async fn render_prompt(
        &self,
        role: Role,
        client_id: &str,
        cancel: &CancellationToken,
    ) -> Result<String, RacedeskError> {
        let settings = match guard(cancel, self.context.business_settings()).await? {
            Ok(settings) => settings,
            Err(e) => {
                warn!(error = %e, "business settings unavailable, using generic prompt");
                generic_settings()
            }
        };
        let profile: Option<ClientProfile> = match role {
            Role::Admin => None,
            Role::Client => match guard(cancel, self.context.get_profile(client_id)).await? {
                Ok(profile) => Some(profile),
                Err(e) => {
                    warn!(client_id, error = %e, "profile unavailable");
                    None
                }
            },
        };
        Ok(prompts::system_prompt(
            role,
            &settings,
            Local::now().date_naive(),
            profile.as_ref(),
        ))
    }

    /// Recent history as conversation turns, minus the message being answered.
    async fn load_history(
        &self,
        client_id: &str,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<ChatMessage>, RacedeskError> {
        let since = Utc::now() - self.history_window;
        let mut history = match guard(cancel, self.context.get_chat_history(client_id, since)).await? {
            Ok(history) => history,
            Err(e) => {
                warn!(client_id, error = %e, "chat history unavailable, continuing without it");
                Vec::new()
            }
        };
        history.retain(|m| !m.text.trim().is_empty());
        if history
            .last()
            .is_some_and(|m| m.sender == Sender::Client && m.text == text)
        {
            history.pop();
        }
        Ok(history.iter().map(ChatMessage::from_history).collect())
    }

    #[allow(clippy::too_many_arguments)]
    async fn finish(
        &self,
        client_id: &str,
        inbound: &str,
        reply: &str,
        state: ConversationState,
        used_primary: bool,
        tool_steps: usize,
        cancel: &CancellationToken,
    ) -> Result<Reply, RacedeskError> {
        if let Err(e) = guard(cancel, self.context.save_message(client_id, Sender::Bot, reply)).await? {
            warn!(client_id, error = %e, "failed to persist reply");
        }
        self.background
            .save_log(DialogLogEntry::for_exchange(client_id, inbound));
        debug!(client_id, %state, used_primary, tool_steps, "message processed");
        Ok(Reply {
            text: reply.to_string(),
            state,
            used_primary,
            tool_steps,
        })
    }
}

fn final_text(turn: ChatTurn) -> String {
    if turn.has_tool_calls() || turn.text.trim().is_empty() {
        CONTINUATION_REPLY.to_string()
    } else {
        turn.text
    }
}

fn generic_settings() -> BusinessSettings {
    BusinessSettings {
        name: "our club".to_string(),
        address: "ask the staff".to_string(),
        working_hours: "ask the staff".to_string(),
    }
}

/// Races `fut` against `cancel`.
async fn guard<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = T>,
) -> Result<T, RacedeskError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RacedeskError::Cancelled),
        out = fut => Ok(out),
    }
}
