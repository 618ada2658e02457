//! Completion backend for the Anthropic messages API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::CompletionBackend;
use crate::config::GenerationConfig;
use crate::error::EngineError;

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [Message<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Backend posting single-message requests to the messages endpoint.
#[derive(Debug, Clone)]
pub struct AnthropicBackend {
    client: reqwest::Client,
    config: GenerationConfig,
    api_key: Option<String>,
}

impl AnthropicBackend {
    /// Create a backend, reading the API key from the configured
    /// environment variable if it is set.
    pub fn new(config: GenerationConfig) -> Self {
        let api_key = config
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: GenerationConfig, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            api_key,
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> MessagesRequest<'a> {
        MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        }
    }
}

/// First text block of a reply; an absent block reads as empty text, which
/// the decoder then rejects.
fn completion_text(response: MessagesResponse) -> String {
    response
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .unwrap_or_default()
}

/// Body of a non-success reply, or why it could not be read.
fn error_body<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|e| format!("<unreadable response body: {}>", e))
}

#[async_trait]
impl CompletionBackend for AnthropicBackend {
    async fn complete(&self, prompt: &str) -> Result<String, EngineError> {
        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("anthropic-version", &self.config.anthropic_version)
            .json(&self.request_body(prompt));
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), model = %self.config.model, "completion response");

        if !status.is_success() {
            let body = error_body(response.text().await);
            return Err(EngineError::Transport {
                status: status.as_u16(),
                body,
            });
        }

        let payload: MessagesResponse = response.json().await.map_err(|e| {
            EngineError::validation(format!("Failed to read model response: {}", e))
        })?;
        Ok(completion_text(payload))
    }
}
