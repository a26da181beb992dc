//! OpenAI Chat Completions client implementing [`LlmClient`].
//!
//! Sends the rendered prompt as a single user message and returns the first choice's text.
//! Requires `OPENAI_API_KEY` (or an explicit [`OpenAIConfig`]); a custom base URL can be set
//! through the config for OpenAI-compatible servers.

use async_trait::async_trait;
use tracing::{debug, trace};

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessage,
        CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::StepError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage};

/// OpenAI Chat Completions client.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Client with default config (API key from `OPENAI_API_KEY`).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Client with explicit config (API key, base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set temperature (0–2). Reasoning models such as `o1` reject it; leave unset for those.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, prompt: &str) -> Result<LlmResponse, StepError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(prompt),
        )]);
        if let Some(t) = self.temperature {
            args.temperature(t);
        }
        let request = args.build().map_err(|e| {
            StepError::ModelInvocation(format!("OpenAI request build failed: {}", e))
        })?;

        debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            temperature = ?self.temperature,
            "OpenAI chat create"
        );
        trace!(prompt = %prompt, "OpenAI request prompt");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| StepError::ModelInvocation(format!("OpenAI API error: {}", e)))?;

        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            StepError::ModelInvocation("OpenAI returned no choices".to_string())
        })?;
        let content = choice.message.content.unwrap_or_default();
        trace!(content = %content, "OpenAI response content");
        debug!(model = %self.model, usage = ?usage, "OpenAI chat complete");

        Ok(LlmResponse { content, usage })
    }
}
