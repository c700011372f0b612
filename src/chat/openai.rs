//! OpenAI-compatible chat-completion provider.

use async_trait::async_trait;
use serde::Deserialize;

use super::{ChatCompletion, ChatError, ChatProvider, CompletionRequest, TokenUsage};
use crate::config::ChatConfig;

/// Talks to `{base_url}/chat/completions` with a bearer token.
pub struct OpenAiProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

impl OpenAiProvider {
    /// Create a provider with the given API key and the configured base URL.
    pub fn new(api_key: String, config: &ChatConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

/// Render an error response body as a single message, keeping the provider's
/// error type and code so quota failures stay recognisable.
fn describe_error(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope { error }) => {
            let mut message = format!("Error code: {} - {}", status.as_u16(), error.message);
            if let Some(code) = error.code.or(error.kind) {
                message.push_str(&format!(" ({code})"));
            }
            message
        }
        Err(_) => format!("Error code: {} - {}", status.as_u16(), body.trim()),
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<ChatCompletion, ChatError> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Provider(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| ChatError::Provider(e.to_string()))?;
        if !status.is_success() {
            return Err(ChatError::Provider(describe_error(status, &body)));
        }

        let parsed: CompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ChatError::Provider(format!("Invalid completion response: {e}")))?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ChatError::Provider("Completion response contained no message".to_string()))?;

        Ok(ChatCompletion {
            content,
            usage: parsed.usage,
        })
    }
}
