//! State graph: nodes + explicit edges (from → to) and conditional edge blocks.
//!
//! Add nodes with `add_node`, pick the first node with `set_entry_point`, chain nodes with
//! `add_edge(from, to)` using [`END`] as the exit target, and use `add_conditional_edges` to
//! branch on a router's label. Then `compile` to get a [`CompiledStateGraph`].
//!
//! # Routing rules
//!
//! A node has at most one of: a single plain outgoing edge, or one conditional edge block.
//! A node with neither ends the run after it executes.
//!
//! # State updates
//!
//! Nodes return a new state that completely replaces the previous one.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use crate::graph::build_error::BuildError;
use crate::graph::compiled::CompiledStateGraph;
use crate::graph::router::{ConditionalEdges, NextEntry, Router};
use crate::graph::step::Step;

/// Terminal marker: use as `to` in `add_edge(last_node, END)` or as a conditional target.
pub const END: &str = "__END__";

/// State graph builder, generic over state type `S`.
///
/// **Interaction**: Accepts `Arc<dyn Step<S>>` nodes and `Arc<dyn Router<S>>` routers; produces
/// `CompiledStateGraph<S>`. [`GraphBuilder`](crate::GraphBuilder) drives it from a
/// [`FlowDefinition`](crate::FlowDefinition).
pub struct StateGraph<S> {
    /// Nodes in declaration order; duplicates are kept so `compile` can report them.
    nodes: Vec<(String, Arc<dyn Step<S>>)>,
    entry_point: Option<String>,
    /// Plain edges (from, to).
    edges: Vec<(String, String)>,
    /// Conditional edge blocks in declaration order.
    conditional_edges: Vec<(String, ConditionalEdges<S>)>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            entry_point: None,
            edges: Vec::new(),
            conditional_edges: Vec::new(),
        }
    }

    /// Adds a node. Names must be unique; a repeated name fails `compile` with `DuplicateNode`.
    pub fn add_node(&mut self, name: impl Into<String>, step: Arc<dyn Step<S>>) -> &mut Self {
        self.nodes.push((name.into(), step));
        self
    }

    /// Sets the node the run starts at.
    pub fn set_entry_point(&mut self, name: impl Into<String>) -> &mut Self {
        self.entry_point = Some(name.into());
        self
    }

    /// Adds a plain edge. `to` may be [`END`].
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push((from.into(), to.into()));
        self
    }

    /// Adds a conditional edge block from `source`.
    ///
    /// After `source` runs, `router` is called with the updated state; its label is looked up in
    /// `conditions` (label → node id or [`END`]). Every target must be a declared node or `END`.
    pub fn add_conditional_edges(
        &mut self,
        source: impl Into<String>,
        router: Arc<dyn Router<S>>,
        conditions: BTreeMap<String, String>,
    ) -> &mut Self {
        self.conditional_edges
            .push((source.into(), ConditionalEdges::new(router, conditions)));
        self
    }

    /// Validates the topology and freezes it.
    ///
    /// Checks, in order: duplicate nodes, entry point, conditional blocks (source and targets
    /// declared, one block per source), plain edges (both ends declared, one edge per source),
    /// and nodes with both kinds of routing.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, BuildError> {
        let mut node_order = Vec::with_capacity(self.nodes.len());
        let mut nodes: HashMap<String, Arc<dyn Step<S>>> = HashMap::new();
        for (name, step) in self.nodes {
            if nodes.contains_key(&name) {
                return Err(BuildError::DuplicateNode(name));
            }
            node_order.push(name.clone());
            nodes.insert(name, step);
        }

        let entry_point = self.entry_point.unwrap_or_default();
        if !nodes.contains_key(&entry_point) {
            return Err(BuildError::InvalidEntryPoint(entry_point));
        }

        let is_target = |id: &str| id == END || nodes.contains_key(id);

        let mut next_map: HashMap<String, NextEntry<S>> = HashMap::new();
        for (source, edges) in self.conditional_edges {
            if !nodes.contains_key(&source) {
                let to = edges
                    .conditions
                    .values()
                    .next()
                    .cloned()
                    .unwrap_or_else(|| END.to_string());
                return Err(BuildError::DanglingEdge {
                    from: source.clone(),
                    to,
                    missing: source,
                });
            }
            for target in edges.conditions.values() {
                if !is_target(target.as_str()) {
                    return Err(BuildError::DanglingEdge {
                        from: source.clone(),
                        to: target.clone(),
                        missing: target.clone(),
                    });
                }
            }
            if edges.conditions.is_empty() {
                tracing::warn!(node = %source, router = %edges.router_name(), "conditional edges have no conditions; every label will be unmapped");
            }
            if next_map.contains_key(&source) {
                return Err(BuildError::ConflictingRouting(source));
            }
            next_map.insert(source, NextEntry::Conditional(edges));
        }

        let mut edge_froms: HashSet<&str> = HashSet::new();
        for (from, to) in &self.edges {
            if !nodes.contains_key(from) {
                return Err(BuildError::DanglingEdge {
                    from: from.clone(),
                    to: to.clone(),
                    missing: from.clone(),
                });
            }
            if !is_target(to.as_str()) {
                return Err(BuildError::DanglingEdge {
                    from: from.clone(),
                    to: to.clone(),
                    missing: to.clone(),
                });
            }
            if !edge_froms.insert(from.as_str()) {
                return Err(BuildError::MultipleSuccessors(from.clone()));
            }
        }
        for (from, to) in self.edges {
            if next_map.contains_key(&from) {
                return Err(BuildError::ConflictingRouting(from));
            }
            next_map.insert(from, NextEntry::Unconditional(to));
        }

        for name in &node_order {
            if !next_map.contains_key(name) {
                tracing::debug!(node = %name, "node has no outgoing edge; runs end after it");
            }
        }

        Ok(CompiledStateGraph {
            nodes: Arc::new(nodes),
            node_order,
            entry_point,
            next_map: Arc::new(next_map),
        })
    }
}
