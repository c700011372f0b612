//! Chat-completion passthrough.
//!
//! This module defines the interface a completion provider must implement,
//! the message types shared with the HTTP layer, and [`ChatService`], which
//! validates requests and classifies provider failures.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ChatConfig;
use crate::constants::{ERROR_CHAT_NO_MESSAGES, ERROR_CHAT_QUOTA_EXCEEDED};

pub mod openai;

pub use openai::OpenAiProvider;

/// Errors returned by the chat passthrough.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("{}", ERROR_CHAT_NO_MESSAGES)]
    EmptyConversation,

    #[error("{}", ERROR_CHAT_QUOTA_EXCEEDED)]
    QuotaExceeded,

    /// Any other provider failure; the message is passed through verbatim.
    #[error("{0}")]
    Provider(String),
}

/// Author of a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Token accounting reported by the provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A fully specified completion request, sampling parameters included.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatCompletion {
    pub content: String,
    pub usage: TokenUsage,
}

/// Provider trait that every chat-completion backend implements.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Returns the provider identifier (e.g., "openai").
    fn provider_name(&self) -> &str;

    /// Perform one completion round trip. No retries.
    async fn complete(&self, request: CompletionRequest) -> Result<ChatCompletion, ChatError>;
}

/// Validates chat requests and forwards them to a [`ChatProvider`].
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn ChatProvider>,
    config: ChatConfig,
}

impl ChatService {
    pub fn new(provider: Arc<dyn ChatProvider>, config: ChatConfig) -> Self {
        Self { provider, config }
    }

    /// Send the conversation to the provider and return its reply.
    ///
    /// `model` falls back to the configured default. An empty conversation
    /// is rejected before the provider is contacted.
    ///
    /// # Errors
    /// - [`ChatError::EmptyConversation`] when `messages` is empty
    /// - [`ChatError::QuotaExceeded`] when the provider reports a quota or billing failure
    /// - [`ChatError::Provider`] for every other provider failure
    pub async fn generate_chat_response(
        &self,
        messages: Vec<ChatMessage>,
        model: Option<String>,
    ) -> Result<ChatCompletion, ChatError> {
        if messages.is_empty() {
            return Err(ChatError::EmptyConversation);
        }

        let request = CompletionRequest {
            model: model.unwrap_or_else(|| self.config.default_model.clone()),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };
        log::debug!(
            "Sending {} messages to {} (model {})",
            request.messages.len(),
            self.provider.provider_name(),
            request.model
        );

        match self.provider.complete(request).await {
            Ok(completion) => {
                log::info!("Chat completion used {} tokens", completion.usage.total_tokens);
                Ok(completion)
            }
            Err(ChatError::Provider(message)) => {
                log::warn!("Chat provider failed: {}", message);
                Err(classify_provider_failure(message))
            }
            Err(other) => {
                log::warn!("Chat provider failed: {}", other);
                Err(other)
            }
        }
    }
}

/// Map a raw provider failure onto the quota case or a verbatim passthrough.
pub fn classify_provider_failure(message: String) -> ChatError {
    let lowered = message.to_lowercase();
    if lowered.contains("quota") || lowered.contains("billing") {
        ChatError::QuotaExceeded
    } else {
        ChatError::Provider(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_and_billing_failures_are_recognised() {
        assert!(matches!(
            classify_provider_failure("You exceeded your current quota".to_string()),
            ChatError::QuotaExceeded
        ));
        assert!(matches!(
            classify_provider_failure("Billing hard limit reached".to_string()),
            ChatError::QuotaExceeded
        ));
    }

    #[test]
    fn other_failures_pass_through_verbatim() {
        match classify_provider_failure("Invalid model: gpt-9".to_string()) {
            ChatError::Provider(message) => assert_eq!(message, "Invalid model: gpt-9"),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn roles_use_lowercase_names() {
        let message: ChatMessage = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert!(serde_json::from_str::<ChatMessage>(r#"{"role":"robot","content":"hi"}"#).is_err());
    }
}
