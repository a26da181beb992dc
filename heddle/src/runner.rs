//! Flow runner: store → registry → graph → execution, in one call.
//!
//! Every [`build`](FlowRunner::build) reads the store again and compiles a fresh registry, so
//! edits to stored definitions take effect on the next build.

use std::sync::Arc;

use thiserror::Error;

use crate::builder::GraphBuilder;
use crate::component::StepBindings;
use crate::definition::{DefinitionError, DefinitionStore};
use crate::graph::{BuildError, CompiledStateGraph, ExecutionError};
use crate::registry::StepRegistry;
use crate::state::FlowState;

/// Any failure of [`FlowRunner::run`].
#[derive(Debug, Error)]
pub enum FlowError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

/// Loads definitions from a store and runs flows by name.
///
/// **Interaction**: Owns the [`StepBindings`] (model clients) that compiled steps use.
#[derive(Clone)]
pub struct FlowRunner {
    store: Arc<dyn DefinitionStore>,
    bindings: StepBindings,
}

impl FlowRunner {
    pub fn new(store: Arc<dyn DefinitionStore>, bindings: StepBindings) -> Self {
        Self { store, bindings }
    }

    pub fn bindings(&self) -> &StepBindings {
        &self.bindings
    }

    /// Fetches all prompts and components and compiles them.
    pub async fn load_registry(&self) -> Result<StepRegistry, DefinitionError> {
        let (prompts, components) =
            futures::future::try_join(self.store.fetch_prompts(), self.store.fetch_components())
                .await?;
        Ok(StepRegistry::load(prompts, components, &self.bindings))
    }

    /// Builds the active flow `flow_name` from the current store contents.
    pub async fn build(&self, flow_name: &str) -> Result<CompiledStateGraph<FlowState>, FlowError> {
        let flow = self.store.fetch_flow(flow_name).await?;
        let registry = self.load_registry().await?;
        let graph = GraphBuilder::build(&flow, &registry)?;
        tracing::info!(flow = flow_name, nodes = graph.node_names().len(), "flow built");
        Ok(graph)
    }

    /// Builds `flow_name` and runs it with `state`.
    pub async fn run(&self, flow_name: &str, state: FlowState) -> Result<FlowState, FlowError> {
        let graph = self.build(flow_name).await?;
        Ok(graph.invoke(state).await?)
    }
}
