//! HTTP client for OpenAI-compatible `chat/completions` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::LlmError;

use super::prompt::ChatMessage;

/// Body of a chat completion request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub response_format: Value,
}

/// Something that can answer a chat completion request with raw content.
///
/// This abstraction allows mocking the endpoint in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Send `request` and return the first choice's message content.
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError>;
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}

/// Client for the real endpoint, authenticated with a bearer key.
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiClient {
    /// `timeout` bounds each whole request. `None` keeps reqwest's default,
    /// which never gives up on a slow model.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(LlmError::Request)?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        let url = self.chat_url();
        debug!(
            "Calling {} with model {} ({} messages)",
            url,
            request.model,
            request.messages.len()
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(LlmError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Chat completion API returned HTTP {}", status.as_u16());
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(LlmError::Request)?;
        let parsed: ChatResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(source) => {
                warn!("Chat completion API returned a non-completion body");
                return Err(LlmError::InvalidResponse { body, source });
            }
        };
        let message = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?
            .message;

        match message {
            ResponseMessage {
                refusal: Some(reason),
                ..
            } if !reason.is_empty() => Err(LlmError::Refused(reason)),
            ResponseMessage {
                content: Some(content),
                ..
            } if !content.trim().is_empty() => Ok(content),
            _ => Err(LlmError::EmptyResponse),
        }
    }
}
