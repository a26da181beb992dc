//! Conditional edges: route to the next node based on state.
//!
//! A source node has a [`Router`] that takes the state produced by that node and returns a
//! label; the label is looked up in the conditions map to get the next node id (or `END`).
//! Labels and node ids are separate namespaces: a label is never used as a node id directly,
//! and an unmapped label is an error at run time.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StepError;

/// Routing logic: state in, label out.
#[async_trait]
pub trait Router<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Router name (component name for compiled routers). Used in logs and errors.
    fn name(&self) -> &str;

    async fn route(&self, state: &S) -> Result<String, StepError>;
}

/// Conditional edge block: router plus label → target map.
///
/// **Interaction**: Stored in `StateGraph` and `CompiledStateGraph`; evaluated in the run loop
/// after the source node has run.
pub struct ConditionalEdges<S> {
    pub(super) router: Arc<dyn Router<S>>,
    pub(super) conditions: BTreeMap<String, String>,
}

impl<S> Clone for ConditionalEdges<S> {
    fn clone(&self) -> Self {
        Self {
            router: Arc::clone(&self.router),
            conditions: self.conditions.clone(),
        }
    }
}

impl<S> ConditionalEdges<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(router: Arc<dyn Router<S>>, conditions: BTreeMap<String, String>) -> Self {
        Self { router, conditions }
    }

    pub fn router_name(&self) -> &str {
        self.router.name()
    }

    pub fn conditions(&self) -> &BTreeMap<String, String> {
        &self.conditions
    }

    /// Target node id (or `END`) for `label`, if mapped.
    pub fn target(&self, label: &str) -> Option<&str> {
        self.conditions.get(label).map(String::as_str)
    }
}

/// How to pick the next node after a given node runs.
pub enum NextEntry<S> {
    /// Single fixed successor (node id or `END`).
    Unconditional(String),
    /// Successor decided at run time by a router.
    Conditional(ConditionalEdges<S>),
}

impl<S> Clone for NextEntry<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Unconditional(to) => Self::Unconditional(to.clone()),
            Self::Conditional(edges) => Self::Conditional(edges.clone()),
        }
    }
}
