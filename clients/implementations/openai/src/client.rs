use std::fmt::{Debug, Formatter};

use anyhow::anyhow;
use async_trait::async_trait;
use da_client::{types::CompletionError, CompletionClient};
use da_config::OpenAIConfig;

use crate::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorEnvelope, Role};

/// Client for an OpenAI compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAIClient {
    api_base: String,
    model: String,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAIClient {
    /// Fails with [`CompletionError::MissingCredential`] when the config carries no key.
    pub fn new(config: &OpenAIConfig) -> Result<Self, CompletionError> {
        let api_key = match config.key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => key.to_string(),
            _ => return Err(CompletionError::MissingCredential),
        };

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: Role::User,
                content: prompt.to_string(),
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Request(e.into()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| CompletionError::Request(e.into()))?;
            let message = match serde_json::from_str::<ErrorEnvelope>(&body) {
                Ok(envelope) => envelope.error.message,
                Err(_) => body,
            };
            tracing::debug!(%status, %message, "completion request refused");
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Decode(anyhow!(e)))?;

        body.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(CompletionError::EmptyResponse)
    }
}

impl Debug for OpenAIClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}
