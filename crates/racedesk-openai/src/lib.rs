// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAI chat-completions backend for racedesk.
//!
//! This is the primary backend: it accepts the canonical tool declarations,
//! translates them into function tools, and turns `tool_calls` in the reply
//! into [`ToolCallRequest`]s.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use racedesk_config::model::OpenAiConfig;
use racedesk_core::types::{
    AdapterType, ChatMessage, ChatRequest, ChatTurn, HealthStatus, ParameterSchema, ToolCallRequest,
    ToolSpec,
};
use racedesk_core::{ChatBackend, PluginAdapter, RacedeskError, is_configured};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::client::{BACKEND, OpenAiClient};
use crate::types::{ApiMessage, ApiTool, ApiToolCall, CompletionRequest, FunctionCall, FunctionDefinition};

/// Primary model backend implementing [`ChatBackend`].
pub struct OpenAiBackend {
    client: OpenAiClient,
}

impl OpenAiBackend {
    /// Builds the backend from `[openai]`. Fails when no usable API key is configured.
    pub fn new(config: &OpenAiConfig) -> Result<Self, RacedeskError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| is_configured(Some(k)))
            .ok_or_else(|| {
                RacedeskError::Config(
                    "OpenAI API key not found. Set openai.api_key in config or OPENAI_API_KEY."
                        .into(),
                )
            })?;
        let client = OpenAiClient::new(
            api_key,
            config.model.clone(),
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self { client })
    }

    fn to_completion_request(&self, request: &ChatRequest) -> CompletionRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(ApiMessage::text("system", request.system.clone()));
        }
        messages.extend(request.messages.iter().map(to_api_message));

        CompletionRequest {
            model: self.client.model().to_string(),
            messages,
            tools: request.tools.iter().map(to_api_tool).collect(),
        }
    }
}

fn to_api_message(message: &ChatMessage) -> ApiMessage {
    match message {
        ChatMessage::User(text) => ApiMessage::text("user", text.clone()),
        ChatMessage::Assistant { text, tool_calls } => {
            let calls: Vec<ApiToolCall> = tool_calls
                .iter()
                .map(|call| ApiToolCall {
                    id: call.id.clone(),
                    call_type: "function".to_string(),
                    function: FunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.to_string(),
                    },
                })
                .collect();
            ApiMessage {
                role: "assistant".to_string(),
                content: if text.is_empty() && !calls.is_empty() {
                    None
                } else {
                    Some(text.clone())
                },
                tool_calls: if calls.is_empty() { None } else { Some(calls) },
                tool_call_id: None,
            }
        }
        ChatMessage::ToolResult {
            call_id, content, ..
        } => ApiMessage {
            role: "tool".to_string(),
            content: Some(content.clone()),
            tool_calls: None,
            tool_call_id: Some(call_id.clone()),
        },
    }
}

/// Translates a canonical tool into a function tool, preserving name,
/// description, property types and the required set.
pub fn to_api_tool(spec: &ToolSpec) -> ApiTool {
    ApiTool {
        tool_type: "function".to_string(),
        function: FunctionDefinition {
            name: spec.name.clone(),
            description: spec.description.clone(),
            parameters: schema_to_json(spec.parameters.as_ref()),
        },
    }
}

fn schema_to_json(schema: Option<&ParameterSchema>) -> Value {
    let Some(schema) = schema.filter(|s| !s.is_empty()) else {
        return json!({"type": "object", "properties": {}});
    };
    let properties: Map<String, Value> = schema
        .properties
        .iter()
        .map(|p| {
            (
                p.name.clone(),
                json!({"type": p.kind.to_string(), "description": p.description}),
            )
        })
        .collect();
    json!({
        "type": "object",
        "properties": properties,
        "required": schema.required,
    })
}

/// Decodes a function call's JSON-string arguments. Anything that is not a
/// JSON object degrades to `{}`.
fn parse_arguments(call: &FunctionCall) -> Value {
    if call.arguments.trim().is_empty() {
        return Value::Object(Map::new());
    }
    match serde_json::from_str::<Value>(&call.arguments) {
        Ok(value @ Value::Object(_)) => value,
        Ok(other) => {
            warn!(tool = %call.name, arguments = %other, "tool arguments are not an object");
            Value::Object(Map::new())
        }
        Err(e) => {
            warn!(tool = %call.name, error = %e, "unparsable tool arguments");
            Value::Object(Map::new())
        }
    }
}

#[async_trait]
impl PluginAdapter for OpenAiBackend {
    fn name(&self) -> &str {
        BACKEND
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Provider
    }

    async fn health_check(&self) -> Result<HealthStatus, RacedeskError> {
        // No probe request: a health check should not spend tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatTurn, RacedeskError> {
        let api_request = self.to_completion_request(request);
        let response = self.client.complete(&api_request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RacedeskError::backend(BACKEND, None, "response has no choices"))?;
        debug!(
            model = %response.model,
            finish_reason = choice.finish_reason.as_deref().unwrap_or(""),
            "completion received"
        );

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCallRequest {
                arguments: parse_arguments(&call.function),
                id: call.id,
                name: call.function.name,
            })
            .collect();

        Ok(ChatTurn {
            text: choice.message.content.unwrap_or_default(),
            tool_calls,
        })
    }
}
