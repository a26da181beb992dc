//! Runtime behaviour of each step kind.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::error::StepError;
use crate::graph::{Router, Step};
use crate::llm::LlmClient;
use crate::prompts::PromptTemplate;
use crate::state::{value_as_text, FlowState, StateError};

/// Field copied from a JSON reply into a state key.
#[derive(Debug, Clone)]
pub(crate) struct Extract {
    pub key: String,
    pub field: String,
    pub lowercase: bool,
}

/// `llm_json`: render, invoke, parse the reply as a JSON object.
pub(crate) struct LlmJsonStep {
    pub name: String,
    pub prompt: Arc<PromptTemplate>,
    pub model: Arc<dyn LlmClient>,
    pub output: Option<String>,
    pub extract: Vec<Extract>,
}

/// `llm_text`: render, invoke, store the reply text.
pub(crate) struct LlmTextStep {
    pub name: String,
    pub prompt: Arc<PromptTemplate>,
    pub model: Arc<dyn LlmClient>,
    pub output: String,
}

/// `render`: render the prompt into a state key; no model call.
pub(crate) struct RenderStep {
    pub name: String,
    pub prompt: Arc<PromptTemplate>,
    pub output: String,
}

/// `set`: write constant values.
pub(crate) struct SetStep {
    pub name: String,
    pub values: Vec<(String, Value)>,
}

/// `route`: label from the value under `key`.
pub(crate) struct RouteRouter {
    pub name: String,
    pub key: String,
    pub cases: BTreeMap<String, String>,
    pub default: Option<String>,
}

async fn render_and_invoke(
    step: &str,
    prompt: &PromptTemplate,
    model: &dyn LlmClient,
    state: &FlowState,
) -> Result<String, StepError> {
    let text = prompt.render(&state.template_vars())?;
    tracing::debug!(step = step, prompt_id = prompt.id(), "invoking model");
    let reply = model.invoke(&text).await?;
    tracing::trace!(step = step, content = %reply.content, "model reply");
    Ok(reply.content)
}

/// Body of a reply wrapped in a Markdown code fence (```json ... ```), else the trimmed reply.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

fn parse_object(content: String) -> Result<Map<String, Value>, StepError> {
    match serde_json::from_str::<Value>(strip_code_fence(&content)) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(StepError::MalformedOutput {
            reason: "expected a JSON object".to_string(),
            content,
        }),
        Err(e) => Err(StepError::MalformedOutput {
            reason: format!("reply is not valid JSON: {}", e),
            content,
        }),
    }
}

#[async_trait]
impl Step<FlowState> for LlmJsonStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, mut state: FlowState) -> Result<FlowState, StepError> {
        let content =
            render_and_invoke(&self.name, &self.prompt, self.model.as_ref(), &state).await?;
        let object = parse_object(content)?;
        for extract in &self.extract {
            let mut text = match object.get(&extract.field) {
                None | Some(Value::Null) => String::new(),
                Some(value) => value_as_text(value),
            };
            if extract.lowercase {
                text = text.to_lowercase();
            }
            state.set(&extract.key, Value::String(text))?;
        }
        if let Some(output) = &self.output {
            state.set(output, Value::Object(object))?;
        }
        Ok(state)
    }
}

#[async_trait]
impl Step<FlowState> for LlmTextStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, mut state: FlowState) -> Result<FlowState, StepError> {
        let content =
            render_and_invoke(&self.name, &self.prompt, self.model.as_ref(), &state).await?;
        state.set(&self.output, Value::String(content))?;
        Ok(state)
    }
}

#[async_trait]
impl Step<FlowState> for RenderStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, mut state: FlowState) -> Result<FlowState, StepError> {
        let text = self.prompt.render(&state.template_vars())?;
        state.set(&self.output, Value::String(text))?;
        Ok(state)
    }
}

#[async_trait]
impl Step<FlowState> for SetStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, mut state: FlowState) -> Result<FlowState, StepError> {
        for (key, value) in &self.values {
            state.set(key, value.clone())?;
        }
        Ok(state)
    }
}

#[async_trait]
impl Router<FlowState> for RouteRouter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn route(&self, state: &FlowState) -> Result<String, StepError> {
        let value = match state.get(&self.key) {
            None | Some(Value::Null) => {
                return self
                    .default
                    .clone()
                    .ok_or_else(|| StateError::MissingKey(self.key.clone()).into());
            }
            Some(value) => value_as_text(&value),
        };
        Ok(self
            .cases
            .get(&value)
            .or(self.default.as_ref())
            .cloned()
            .unwrap_or(value))
    }
}
