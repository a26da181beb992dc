//! Turns a [`ComponentDefinition`] into a [`CompiledStep`].

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::definition::ComponentDefinition;
use crate::llm::LlmClient;
use crate::prompts::{binding_name, PromptTemplate};
use crate::state::FlowState;

use super::kinds::{Extract, LlmJsonStep, LlmTextStep, RenderStep, RouteRouter, SetStep};
use super::source::{self, StepSpec};
use super::{CompileError, CompileFailure, CompiledStep, StepBindings};

/// Compiles component sources against a set of bindings.
///
/// Compilation is pure: the same source and bindings always give an equivalent step, and no
/// model is called.
pub struct StepCompiler;

impl StepCompiler {
    /// Compiles one component. Failures name the component and never affect other components.
    pub fn compile(
        component: &ComponentDefinition,
        bindings: &StepBindings,
    ) -> Result<CompiledStep, CompileError> {
        Self::compile_inner(component, bindings)
            .map_err(|reason| CompileError::new(component.name.clone(), reason))
    }

    fn compile_inner(
        component: &ComponentDefinition,
        bindings: &StepBindings,
    ) -> Result<CompiledStep, CompileFailure> {
        let name = component.name.clone();
        let step = match source::parse(&component.name, &component.source)? {
            StepSpec::LlmJson(spec) => {
                if let Some(output) = &spec.output {
                    check_writable(output, Value::Object(Map::new()))?;
                }
                let mut extract = Vec::with_capacity(spec.extract.len());
                for (key, field) in spec.extract {
                    check_writable(&key, Value::String(String::new()))?;
                    extract.push(Extract {
                        key,
                        field: field.field,
                        lowercase: field.lowercase,
                    });
                }
                CompiledStep::Node(Arc::new(LlmJsonStep {
                    prompt: resolve_prompt(spec.prompt.as_deref(), component, bindings)?,
                    model: resolve_model(&spec.model, bindings)?,
                    output: spec.output,
                    extract,
                    name,
                }))
            }
            StepSpec::LlmText(spec) => {
                check_writable(&spec.output, Value::String(String::new()))?;
                CompiledStep::Node(Arc::new(LlmTextStep {
                    prompt: resolve_prompt(spec.prompt.as_deref(), component, bindings)?,
                    model: resolve_model(&spec.model, bindings)?,
                    output: spec.output,
                    name,
                }))
            }
            StepSpec::Render(spec) => {
                check_writable(&spec.output, Value::String(String::new()))?;
                CompiledStep::Node(Arc::new(RenderStep {
                    prompt: resolve_prompt(spec.prompt.as_deref(), component, bindings)?,
                    output: spec.output,
                    name,
                }))
            }
            StepSpec::Set(spec) => {
                let mut values = Vec::with_capacity(spec.values.len());
                for (key, value) in spec.values {
                    let value = serde_json::to_value(value)
                        .map_err(|e| CompileFailure::InvalidDefinition(e.to_string()))?;
                    check_writable(&key, value.clone())?;
                    values.push((key, value));
                }
                CompiledStep::Node(Arc::new(SetStep { name, values }))
            }
            StepSpec::Route(spec) => CompiledStep::Router(Arc::new(RouteRouter {
                name,
                key: spec.key,
                cases: spec.cases,
                default: spec.default,
            })),
        };
        Ok(step)
    }
}

/// Rejects writes that would fail the state's type check for every execution.
fn check_writable(key: &str, sample: Value) -> Result<(), CompileFailure> {
    FlowState::default()
        .set(key, sample)
        .map_err(|e| CompileFailure::InvalidDefinition(e.to_string()))
}

fn resolve_prompt(
    named: Option<&str>,
    component: &ComponentDefinition,
    bindings: &StepBindings,
) -> Result<Arc<PromptTemplate>, CompileFailure> {
    let binding = match (named, component.prompt_id) {
        (Some(name), _) => name.to_string(),
        (None, Some(id)) => binding_name(id),
        (None, None) => return Err(CompileFailure::MissingPrompt),
    };
    bindings
        .prompt(&binding)
        .cloned()
        .ok_or(CompileFailure::UnboundPrompt(binding))
}

fn resolve_model(role: &str, bindings: &StepBindings) -> Result<Arc<dyn LlmClient>, CompileFailure> {
    bindings
        .model(role)
        .cloned()
        .ok_or_else(|| CompileFailure::UnboundModel(role.to_string()))
}
