//! Scripted chat model for tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use tandem_core::{ChatMessage, ToolSpec};

use crate::error::{LlmError, LlmResult};
use crate::model::ChatModel;

/// A recorded call to [`MockChatModel`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub messages: Vec<ChatMessage>,
    pub tools: Vec<String>,
}

/// Chat model that replays queued responses in order
#[derive(Debug, Default)]
pub struct MockChatModel {
    responses: Mutex<VecDeque<LlmResult<ChatMessage>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    pub fn with_response(self, message: ChatMessage) -> Self {
        self.push(Ok(message));
        self
    }

    /// Queue a failure
    pub fn with_error(self, error: LlmError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, response: LlmResult<ChatMessage>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    fn model_name(&self) -> &str {
        "mock"
    }

    async fn chat(&self, messages: &[ChatMessage], tools: &[ToolSpec]) -> LlmResult<ChatMessage> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                messages: messages.to_vec(),
                tools: tools.iter().map(|t| t.name.clone()).collect(),
            });
        }

        self.responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| {
                Err(LlmError::invalid_response(
                    "mock",
                    "no scripted responses left",
                ))
            })
    }
}
