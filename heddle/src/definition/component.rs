//! Stored component and prompt records.

use serde::{Deserialize, Serialize};

use crate::prompts::PromptId;

/// A named unit of behaviour as stored: source text plus an optional default prompt.
///
/// `source` is compiled by [`StepCompiler`](crate::component::StepCompiler). Components with
/// `is_executable == false` are skipped at load time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDefinition {
    pub name: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<PromptId>,
    #[serde(default)]
    pub is_executable: bool,
}

impl ComponentDefinition {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            prompt_id: None,
            is_executable: true,
        }
    }

    pub fn with_prompt(mut self, id: PromptId) -> Self {
        self.prompt_id = Some(id);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.is_executable = false;
        self
    }
}

/// A stored prompt template, not yet parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: PromptId,
    pub template: String,
}

impl PromptRecord {
    pub fn new(id: PromptId, template: impl Into<String>) -> Self {
        Self {
            id,
            template: template.into(),
        }
    }
}
