//! Step registry: the prompts and compiled components one build works from.
//!
//! Built fresh for every build by [`StepRegistry::load`]; nothing is cached across builds.
//! Components that failed to compile are remembered with their error so that a flow using
//! one reports why it is missing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use thiserror::Error;

use crate::component::{CompileError, CompileFailure, CompiledStep, StepBindings, StepCompiler};
use crate::definition::{ComponentDefinition, PromptRecord};
use crate::prompts::{PromptId, PromptTemplate};

/// A flow referenced a component the registry cannot provide.
#[derive(Debug, Clone, Error)]
#[error(
    "unknown component `{name}`{}",
    .compile_error.as_ref().map(|e| format!(" ({})", e.reason)).unwrap_or_default()
)]
pub struct UnresolvedComponent {
    pub name: String,
    /// Why the component is missing, if it failed to compile.
    #[source]
    pub compile_error: Option<CompileError>,
}

/// Prompt templates by id and compiled components by name, plus compile failures.
#[derive(Debug, Default)]
pub struct StepRegistry {
    prompts: BTreeMap<PromptId, Arc<PromptTemplate>>,
    components: HashMap<String, CompiledStep>,
    failures: Vec<CompileError>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads prompts and compiles every executable component.
    ///
    /// Prompts that fail to parse are skipped with a warning. Every parsed prompt is bound as
    /// `prompt{id}` on a copy of `bindings` before components compile. Non-executable
    /// components are skipped. Compile failures, including a repeated component name, are
    /// recorded and do not stop the load.
    pub fn load(
        prompts: Vec<PromptRecord>,
        components: Vec<ComponentDefinition>,
        bindings: &StepBindings,
    ) -> Self {
        let mut registry = Self::new();
        let mut bindings = bindings.clone();

        for record in prompts {
            match PromptTemplate::new(record.id, record.template) {
                Ok(template) => {
                    let template = Arc::new(template);
                    if registry.prompts.contains_key(&template.id()) {
                        tracing::warn!(prompt_id = template.id(), "duplicate prompt id; keeping the first");
                        continue;
                    }
                    bindings.bind_shared_prompt(Arc::clone(&template));
                    registry.prompts.insert(template.id(), template);
                }
                Err(e) => {
                    tracing::warn!(prompt_id = record.id, error = %e, "skipping invalid prompt template");
                }
            }
        }

        let mut seen: HashSet<String> = HashSet::new();
        for component in components {
            if !component.is_executable {
                tracing::debug!(component = %component.name, "skipping non-executable component");
                continue;
            }
            if !seen.insert(component.name.clone()) {
                registry.record_failure(CompileError::new(
                    component.name,
                    CompileFailure::DuplicateName,
                ));
                continue;
            }
            match StepCompiler::compile(&component, &bindings) {
                Ok(step) => {
                    if let Err(e) = registry.register_component(component.name, step) {
                        registry.record_failure(e);
                    }
                }
                Err(e) => registry.record_failure(e),
            }
        }

        tracing::debug!(
            prompts = registry.prompts.len(),
            components = registry.components.len(),
            failures = registry.failures.len(),
            "step registry loaded"
        );
        registry
    }

    /// Adds a prompt, replacing any prompt with the same id.
    pub fn register_prompt(&mut self, template: PromptTemplate) {
        self.prompts.insert(template.id(), Arc::new(template));
    }

    /// Adds a compiled component. A name that is already registered is a `DuplicateName`
    /// failure and leaves the registry unchanged.
    pub fn register_component(
        &mut self,
        name: impl Into<String>,
        step: CompiledStep,
    ) -> Result<(), CompileError> {
        let name = name.into();
        if self.components.contains_key(&name) {
            return Err(CompileError::new(name, CompileFailure::DuplicateName));
        }
        self.components.insert(name, step);
        Ok(())
    }

    /// Records a compile failure and logs it.
    pub fn record_failure(&mut self, error: CompileError) {
        tracing::warn!(component = %error.component, reason = %error.reason, "component failed to compile");
        self.failures.push(error);
    }

    /// The compiled component `name`, or why there is none.
    pub fn resolve(&self, name: &str) -> Result<CompiledStep, UnresolvedComponent> {
        if let Some(step) = self.components.get(name) {
            return Ok(step.clone());
        }
        Err(UnresolvedComponent {
            name: name.to_string(),
            compile_error: self.failures.iter().find(|e| e.component == name).cloned(),
        })
    }

    pub fn prompt(&self, id: PromptId) -> Option<&Arc<PromptTemplate>> {
        self.prompts.get(&id)
    }

    /// Registered component names, sorted.
    pub fn component_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.components.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn failures(&self) -> &[CompileError] {
        &self.failures
    }
}
