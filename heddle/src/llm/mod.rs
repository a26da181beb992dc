//! Model invocation handles used by compiled steps.
//!
//! Steps render a prompt and hand the text to an [`LlmClient`]; the engine itself never calls a
//! model. Implementations: [`MockLlm`] (fixed or scripted replies) and [`ChatOpenAI`]
//! (OpenAI-compatible Chat Completions).
//!
//! Step bindings expose one client per logical model role; the built-in roles are
//! [`REASONING_ROLE`] and [`MAIN_ROLE`].

mod mock;
mod openai;

pub use mock::MockLlm;
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::StepError;

/// Role for analysis/classification calls.
pub const REASONING_ROLE: &str = "reasoning";

/// Role for user-facing response generation.
pub const MAIN_ROLE: &str = "main";

/// Token usage for one model call.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LlmUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reply from one model call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LlmResponse {
    /// Assistant reply text.
    pub content: String,
    /// Token usage, when the backend reports it.
    pub usage: Option<LlmUsage>,
}

impl LlmResponse {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }
}

/// Model client: rendered prompt in, reply text out.
///
/// Implementations must be safe to share across concurrent executions and must not keep
/// per-execution state between calls.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// One call. Transport or API failures map to [`StepError::ModelInvocation`].
    async fn invoke(&self, prompt: &str) -> Result<LlmResponse, StepError>;
}
