//! # Heddle
//!
//! A data-driven workflow graph engine. Prompts, step components and flow shapes live in a
//! definition store; Heddle loads them, compiles the components into typed steps, wires them
//! into a graph, and runs the graph with a **state-in, state-out** design: one state value
//! flows through the nodes, each node returns the state that replaces it, and routers pick
//! the next node from the updated state.
//!
//! ## Design principles
//!
//! - **Definitions are data**: a component's source is a TOML table naming one of a closed set
//!   of step kinds (`llm_json`, `llm_text`, `render`, `set`, `route`); nothing stored is ever
//!   executed as code.
//! - **Failures stay local**: a component that fails to compile is recorded and only matters
//!   when a flow uses it.
//! - **Frozen graphs**: [`GraphBuilder::build`] validates the whole topology up front and the
//!   resulting [`CompiledStateGraph`] is immutable and shareable across concurrent runs.
//! - **Generic engine**: [`StateGraph`] and [`CompiledStateGraph`] work for any state type;
//!   data-driven flows use [`FlowState`].
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Step`], [`Router`], [`END`]: build
//!   and run state graphs; [`generate_dot`], [`generate_text`] for visualization.
//! - [`definition`]: [`FlowDefinition`], [`ComponentDefinition`], [`PromptRecord`],
//!   [`DefinitionStore`], [`InMemoryDefinitionStore`].
//! - [`component`]: [`StepCompiler`], [`CompiledStep`], [`StepBindings`].
//! - [`registry`]: [`StepRegistry`]. [`builder`]: [`GraphBuilder`]. [`runner`]: [`FlowRunner`].
//! - [`state`]: [`FlowState`]. [`prompts`]: [`PromptTemplate`].
//! - [`llm`]: [`LlmClient`], [`MockLlm`], [`ChatOpenAI`]. [`settings`]: [`ModelSettings`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use heddle::{FlowRunner, FlowState, InMemoryDefinitionStore, ModelSettings};
//!
//! let store = Arc::new(InMemoryDefinitionStore::sentiment_analysis()?);
//! let bindings = ModelSettings::load("heddle")?.into_bindings();
//! let runner = FlowRunner::new(store, bindings);
//! let state = runner
//!     .run("sentiment_analysis_flow", FlowState::new("I love how intuitive the UI is."))
//!     .await?;
//! println!("{}", state.require_final_response()?);
//! ```

pub mod builder;
pub mod component;
pub mod definition;
pub mod error;
pub mod graph;
pub mod llm;
pub mod prompts;
pub mod registry;
pub mod runner;
pub mod settings;
pub mod state;

pub use builder::GraphBuilder;
pub use component::{CompileError, CompileFailure, CompiledStep, StepBindings, StepCompiler};
pub use definition::{
    ComponentDefinition, ConditionalEdgesDecl, DefinitionError, DefinitionSeed, DefinitionStore,
    EdgeDecl, FlowDefinition, FlowRecord, InMemoryDefinitionStore, NodeDecl, PromptRecord,
    SENTIMENT_ANALYSIS_FLOW,
};
pub use error::StepError;
pub use graph::{
    generate_dot, generate_text, BuildError, CompiledStateGraph, ExecutionError, FnRouter,
    FnStep, GraphEvent, Router, StateGraph, Step, END,
};
pub use llm::{ChatOpenAI, LlmClient, LlmResponse, LlmUsage, MockLlm, MAIN_ROLE, REASONING_ROLE};
pub use prompts::{PromptId, PromptTemplate, TemplateError};
pub use registry::{StepRegistry, UnresolvedComponent};
pub use runner::{FlowError, FlowRunner};
pub use settings::{ModelSettings, RoleModel, SettingsError};
pub use state::{FlowState, StateError};
