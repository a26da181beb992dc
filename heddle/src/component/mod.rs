//! Components: stored step sources compiled into runnable nodes and routers.
//!
//! A component's source is a TOML table naming one step of a closed set of kinds
//! (`llm_json`, `llm_text`, `render`, `set`, `route`). [`StepCompiler`] checks it against the
//! available [`StepBindings`] (prompt templates and model roles) and produces a
//! [`CompiledStep`]. Each component compiles or fails on its own.

mod compile_error;
mod compiler;
mod kinds;
mod source;

pub use compile_error::{CompileError, CompileFailure};
pub use compiler::StepCompiler;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::graph::{Router, Step};
use crate::llm::LlmClient;
use crate::prompts::{binding_name, PromptTemplate};
use crate::state::FlowState;

/// A compiled component: a node step or a router.
#[derive(Clone)]
pub enum CompiledStep {
    /// `State -> State`.
    Node(Arc<dyn Step<FlowState>>),
    /// `State -> label`.
    Router(Arc<dyn Router<FlowState>>),
}

impl CompiledStep {
    pub fn name(&self) -> &str {
        match self {
            Self::Node(step) => step.name(),
            Self::Router(router) => router.name(),
        }
    }

    /// `"node"` or `"router"`.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Node(_) => "node",
            Self::Router(_) => "router",
        }
    }
}

impl fmt::Debug for CompiledStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompiledStep::{}({})", self.kind(), self.name())
    }
}

/// What compiled steps may refer to: prompt templates by binding name (`prompt{id}`) and model
/// clients by role.
///
/// **Interaction**: Built by [`ModelSettings::into_bindings`](crate::ModelSettings::into_bindings)
/// or by hand with mocks; [`StepRegistry::load`](crate::StepRegistry::load) adds the loaded
/// prompts before compiling components.
#[derive(Clone, Default)]
pub struct StepBindings {
    prompts: HashMap<String, Arc<PromptTemplate>>,
    models: HashMap<String, Arc<dyn LlmClient>>,
}

impl StepBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `model` to `role`, replacing any previous client for it.
    pub fn with_model(mut self, role: impl Into<String>, model: Arc<dyn LlmClient>) -> Self {
        self.models.insert(role.into(), model);
        self
    }

    /// Binds `template` under `prompt{id}`.
    pub fn bind_prompt(&mut self, template: PromptTemplate) {
        self.bind_shared_prompt(Arc::new(template));
    }

    pub(crate) fn bind_shared_prompt(&mut self, template: Arc<PromptTemplate>) {
        self.prompts.insert(binding_name(template.id()), template);
    }

    pub fn prompt(&self, binding: &str) -> Option<&Arc<PromptTemplate>> {
        self.prompts.get(binding)
    }

    pub fn model(&self, role: &str) -> Option<&Arc<dyn LlmClient>> {
        self.models.get(role)
    }

    /// Bound model roles, sorted.
    pub fn roles(&self) -> Vec<&str> {
        let mut roles: Vec<&str> = self.models.keys().map(String::as_str).collect();
        roles.sort_unstable();
        roles
    }
}

impl fmt::Debug for StepBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut prompts: Vec<&str> = self.prompts.keys().map(String::as_str).collect();
        prompts.sort_unstable();
        f.debug_struct("StepBindings")
            .field("prompts", &prompts)
            .field("models", &self.roles())
            .finish()
    }
}
