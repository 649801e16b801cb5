use log::{ info, warn, error };
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::{ recent_turns, strip_links, GatheredData };
use crate::config::prompt::{ get_presentation_user_prompt, PromptConfig };
use crate::llm::chat::{
    ChatClient,
    CompletionRequest,
    CompletionResponse,
    PromptMessage,
    ToolCall,
    ToolChoice,
};
use crate::llm::{ with_deadline, LlmError };
use crate::models::chat::{ ChatResult, ConversationTurn, UiPayload };
use crate::schema::SchemaRegistry;

#[derive(Debug, Error)]
pub enum ComposeError {
    #[error(transparent)]
    Provider(#[from] LlmError),
    #[error("tool '{tool}' returned malformed arguments: {reason}")]
    ToolArguments {
        tool: String,
        reason: String,
    },
}

/// Turns gathered facts into the user-facing reply and UI payload.
pub struct Composer {
    client: Arc<dyn ChatClient>,
    registry: Arc<SchemaRegistry>,
    prompts: Arc<PromptConfig>,
    context_turns: usize,
    temperature: f32,
    deadline: Duration,
}

impl Composer {
    pub fn new(
        client: Arc<dyn ChatClient>,
        registry: Arc<SchemaRegistry>,
        prompts: Arc<PromptConfig>,
        context_turns: usize,
        temperature: f32,
        deadline: Duration
    ) -> Self {
        Self { client, registry, prompts, context_turns, temperature, deadline }
    }

    pub fn build_request(
        &self,
        query: &str,
        history: &[ConversationTurn],
        gathered: &GatheredData
    ) -> CompletionRequest {
        match gathered.data() {
            Some(data) => {
                let messages = vec![
                    PromptMessage::system(self.prompts.presentation_system.clone()),
                    PromptMessage::user(get_presentation_user_prompt(&self.prompts, query, data))
                ];
                CompletionRequest::new(messages)
                    .with_tools(self.registry.tools().to_vec(), ToolChoice::Auto)
                    .with_temperature(self.temperature)
            }
            None => {
                let mut messages = vec![
                    PromptMessage::system(self.prompts.conversational_system.clone())
                ];
                messages.extend(
                    recent_turns(history, self.context_turns).iter().map(PromptMessage::from)
                );
                messages.push(PromptMessage::user(query));
                CompletionRequest::new(messages).with_temperature(self.temperature)
            }
        }
    }

    /// Always yields a result; failures become the apology reply with the
    /// error description in `ui_data.data.error`.
    pub async fn compose(
        &self,
        query: &str,
        history: &[ConversationTurn],
        gathered: &GatheredData
    ) -> ChatResult {
        match self.try_compose(query, history, gathered).await {
            Ok(result) => result,
            Err(e) => {
                error!("Response composition failed: {}", e);
                ChatResult::new(self.prompts.fallbacks.apology.clone(), UiPayload::error(e.to_string()))
            }
        }
    }

    async fn try_compose(
        &self,
        query: &str,
        history: &[ConversationTurn],
        gathered: &GatheredData
    ) -> Result<ChatResult, ComposeError> {
        if gathered.is_data() {
            info!("Data was gathered; composing reply with {} tools", self.registry.len());
        } else {
            info!("No data to present; composing a conversational reply");
        }

        let request = self.build_request(query, history, gathered);
        let response = with_deadline(self.deadline, self.client.complete(&request)).await?;
        self.interpret(response)
    }

    fn interpret(&self, response: CompletionResponse) -> Result<ChatResult, ComposeError> {
        let text = response.content
            .as_deref()
            .map(strip_links)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());

        if response.tool_calls.len() > 1 {
            warn!("Model returned {} tool calls; using the first", response.tool_calls.len());
        }

        match response.tool_calls.into_iter().next() {
            Some(call) => {
                let data = parse_tool_arguments(&call)?;
                if !self.registry.contains(&call.name) {
                    warn!("Model called unknown tool '{}'", call.name);
                }
                let component_type = self.registry.component_type_for(&call.name);
                info!("UI component generated: '{}'", component_type);

                let reply = text.unwrap_or_else(|| self.prompts.fallbacks.tool_acknowledgement.clone());
                Ok(ChatResult::new(reply, UiPayload::new(component_type, data)))
            }
            None => {
                info!("No tool call was made; response is text-only");
                let reply = text.unwrap_or_else(|| self.prompts.fallbacks.minimal_reply.clone());
                Ok(ChatResult::new(reply, UiPayload::generic()))
            }
        }
    }
}

fn parse_tool_arguments(call: &ToolCall) -> Result<JsonValue, ComposeError> {
    let value: JsonValue = serde_json
        ::from_str(&call.arguments)
        .map_err(|e| ComposeError::ToolArguments {
            tool: call.name.clone(),
            reason: e.to_string(),
        })?;

    if !value.is_object() {
        return Err(ComposeError::ToolArguments {
            tool: call.name.clone(),
            reason: "arguments must be a JSON object".to_string(),
        });
    }
    Ok(value)
}
