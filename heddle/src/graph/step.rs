//! Graph step trait: the callable behind one node.
//!
//! Receives state `S`, returns the updated `S`. The returned state replaces the current one;
//! the graph does no merging. Routing is decided by the graph's edges, never by the step.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::StepError;

/// One node's logic: state in, state out.
///
/// **Interaction**: Registered with [`StateGraph::add_node`](super::StateGraph::add_node);
/// invoked by [`CompiledStateGraph::invoke`](super::CompiledStateGraph::invoke). Compiled
/// components ([`CompiledStep::Node`](crate::component::CompiledStep)) implement it for
/// [`FlowState`](crate::FlowState).
#[async_trait]
pub trait Step<S>: Send + Sync
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Step name (component name for compiled steps). Used in logs and errors.
    fn name(&self) -> &str;

    async fn run(&self, state: S) -> Result<S, StepError>;
}
