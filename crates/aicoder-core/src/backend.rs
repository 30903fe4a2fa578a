//! Language model backends
//!
//! [`LanguageModel`] is the seam between the engine and whatever produces
//! code. [`OpenAiChatModel`] talks to any OpenAI-compatible
//! `/chat/completions` endpoint.

use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::prompts::CODE_GENERATION_PROMPT;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text-in, text-out model
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    /// Complete `prompt`
    ///
    /// `instruction` replaces the backend's default system instruction.
    async fn generate(&self, prompt: &str, instruction: Option<&str>) -> Result<String, BackendError>;
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat completions API
#[derive(Debug, Clone)]
pub struct OpenAiChatModel {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
    temperature: Option<f32>,
    system_prompt: String,
}

impl OpenAiChatModel {
    /// Build from backend config, reading the API key from its environment
    /// variable
    ///
    /// # Errors
    /// [`BackendError::MissingApiKey`] when the variable is unset, or
    /// [`BackendError::Http`] when the HTTP client cannot be built.
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| BackendError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    /// Build from backend config with an explicit API key
    ///
    /// # Errors
    /// [`BackendError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &BackendConfig, api_key: impl Into<String>) -> Result<Self, BackendError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: chat_endpoint(&config.base_url),
            model: config.model.clone(),
            api_key: api_key.into(),
            temperature: config.temperature,
            system_prompt: config
                .system_prompt
                .clone()
                .unwrap_or_else(|| CODE_GENERATION_PROMPT.to_string()),
        })
    }

    /// Resolved completions endpoint
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAiChatModel {
    async fn generate(&self, prompt: &str, instruction: Option<&str>) -> Result<String, BackendError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: instruction.unwrap_or(self.system_prompt.as_str()),
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!("POST {} ({} prompt bytes)", self.endpoint, prompt.len());
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = response.json().await?;
        completion_text(reply)
    }
}

fn completion_text(reply: ChatResponse) -> Result<String, BackendError> {
    reply
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(BackendError::EmptyResponse)
}

fn chat_endpoint(base_url: &str) -> String {
    if base_url.ends_with("/chat/completions") {
        base_url.to_string()
    } else {
        format!("{}/chat/completions", base_url.trim_end_matches('/'))
    }
}
