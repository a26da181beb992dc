//! Mock LLM for tests and examples.
//!
//! Returns a fixed reply, or a scripted sequence of replies/failures, and records every prompt
//! it receives so tests can assert on rendered templates.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::StepError;
use crate::llm::{LlmClient, LlmResponse};

enum Reply {
    Content(String),
    Failure(String),
}

/// Mock model client.
///
/// With a script, each call pops the next reply; once the script is exhausted the fallback
/// reply is returned.
pub struct MockLlm {
    fallback: Reply,
    script: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl MockLlm {
    /// Always replies with `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            fallback: Reply::Content(content.into()),
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always fails with `StepError::ModelInvocation(message)`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fallback: Reply::Failure(message.into()),
            script: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queues `content` to be returned before the fallback (builder).
    pub fn then_reply(self, content: impl Into<String>) -> Self {
        self.push(Reply::Content(content.into()));
        self
    }

    /// Queues a failure to be returned before the fallback (builder).
    pub fn then_fail(self, message: impl Into<String>) -> Self {
        self.push(Reply::Failure(message.into()));
        self
    }

    fn push(&self, reply: Reply) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(reply);
        }
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().map(|p| p.len()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(&self, prompt: &str) -> Result<LlmResponse, StepError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        let reply = match &scripted {
            Some(r) => r,
            None => &self.fallback,
        };
        match reply {
            Reply::Content(c) => Ok(LlmResponse::new(c.clone())),
            Reply::Failure(m) => Err(StepError::ModelInvocation(m.clone())),
        }
    }
}
