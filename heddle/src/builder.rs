//! Graph builder: turns a [`FlowDefinition`] plus a [`StepRegistry`] into an executable graph.
//!
//! Components are resolved first (unknown names and node/router mix-ups), then the topology is
//! handed to [`StateGraph`], which checks the entry point and every edge before freezing it.

use std::collections::HashSet;

use crate::component::CompiledStep;
use crate::definition::FlowDefinition;
use crate::graph::{BuildError, CompiledStateGraph, StateGraph};
use crate::registry::StepRegistry;
use crate::state::FlowState;

/// Builds executable graphs from flow definitions.
pub struct GraphBuilder;

impl GraphBuilder {
    /// Validates `flow` against `registry` and freezes it.
    ///
    /// Pure: building the same inputs twice gives two independent graphs that behave the same.
    /// On any error no graph is returned.
    pub fn build(
        flow: &FlowDefinition,
        registry: &StepRegistry,
    ) -> Result<CompiledStateGraph<FlowState>, BuildError> {
        let mut graph = StateGraph::<FlowState>::new();

        let mut declared: HashSet<&str> = HashSet::new();
        for node in &flow.nodes {
            if !declared.insert(node.name.as_str()) {
                return Err(BuildError::DuplicateNode(node.name.clone()));
            }
            match registry.resolve(&node.component)? {
                CompiledStep::Node(step) => {
                    graph.add_node(node.name.clone(), step);
                }
                other => {
                    return Err(BuildError::ComponentKindMismatch {
                        component: node.component.clone(),
                        usage: format!("node `{}`", node.name),
                        expected: "node",
                        actual: other.kind(),
                    })
                }
            }
        }

        if let Some(conditional) = &flow.conditional_edges {
            match registry.resolve(&conditional.router)? {
                CompiledStep::Router(router) => {
                    graph.add_conditional_edges(
                        conditional.from.clone(),
                        router,
                        conditional.conditions.clone(),
                    );
                }
                other => {
                    return Err(BuildError::ComponentKindMismatch {
                        component: conditional.router.clone(),
                        usage: format!("conditional edges from `{}`", conditional.from),
                        expected: "router",
                        actual: other.kind(),
                    })
                }
            }
        }

        graph.set_entry_point(flow.entry_point.clone());
        for edge in &flow.edges {
            graph.add_edge(edge.from.clone(), edge.to.clone());
        }

        let compiled = graph.compile()?;
        tracing::debug!(
            entry_point = %flow.entry_point,
            nodes = flow.nodes.len(),
            edges = flow.edges.len(),
            conditional = flow.conditional_edges.is_some(),
            "flow graph built"
        );
        Ok(compiled)
    }
}
