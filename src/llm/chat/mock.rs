//! Scripted chat client for tests and local dry runs.
//!
//! Replies are consumed in order; every request is recorded so callers can
//! assert on what was sent to the provider.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{ ChatClient, CompletionRequest, CompletionResponse };
use crate::llm::LlmError;

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Respond(CompletionResponse),
    /// Fails like an upstream gateway error with the given body.
    Fail(String),
    /// Never answers within any sane deadline.
    Hang,
}

#[derive(Debug, Default)]
pub struct ScriptedChatClient {
    model: String,
    replies: Mutex<VecDeque<ScriptedReply>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedChatClient {
    pub fn new(model: impl Into<String>) -> Self {
        Self { model: model.into(), ..Self::default() }
    }

    pub fn with_reply(self, reply: ScriptedReply) -> Self {
        self.push(reply);
        self
    }

    pub fn respond(self, response: CompletionResponse) -> Self {
        self.with_reply(ScriptedReply::Respond(response))
    }

    pub fn fail(self, body: impl Into<String>) -> Self {
        self.with_reply(ScriptedReply::Fail(body.into()))
    }

    pub fn push(&self, reply: ScriptedReply) {
        self.replies.lock().unwrap_or_else(|e| e.into_inner()).push_back(reply);
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl ChatClient for ScriptedChatClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request.clone());
        let next = self.replies.lock().unwrap_or_else(|e| e.into_inner()).pop_front();

        match next {
            Some(ScriptedReply::Respond(response)) => Ok(response),
            Some(ScriptedReply::Fail(body)) => Err(LlmError::Status { status: 502, body }),
            Some(ScriptedReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(LlmError::EmptyResponse)
            }
            None => Err(LlmError::EmptyResponse),
        }
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}
