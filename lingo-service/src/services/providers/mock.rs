//! Mock provider for tests.

use super::{
    ChatMessage, ChatProvider, FinishReason, GenerationParams, ProviderError, ProviderResponse,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Replies with a canned text (or error) and records every conversation.
pub struct MockChatProvider {
    reply: Result<String, String>,
    finish_reason: FinishReason,
    requests: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatProvider {
    pub fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Ok(text.into()),
            finish_reason: FinishReason::Complete,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            finish_reason: FinishReason::Complete,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replies with `text` as if the model hit its token limit.
    pub fn truncated(text: impl Into<String>) -> Self {
        Self {
            finish_reason: FinishReason::Length,
            ..Self::replying(text)
        }
    }

    /// Conversations received so far, oldest first.
    pub fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn model(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(messages.to_vec());
        }

        match &self.reply {
            Ok(text) => Ok(ProviderResponse {
                text: Some(text.clone()),
                input_tokens: 0,
                output_tokens: 0,
                finish_reason: self.finish_reason,
            }),
            Err(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }
}
