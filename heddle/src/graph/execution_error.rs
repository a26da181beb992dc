//! Graph execution error.
//!
//! Returned by [`CompiledStateGraph::invoke`](super::CompiledStateGraph::invoke). Execution stops
//! at the first failure; no partial state is returned.

use thiserror::Error;

use crate::error::StepError;

#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The router returned a label with no entry in the conditions map.
    #[error("router `{router}` after node `{node}` returned unmapped label `{label}`")]
    UnknownRoute {
        node: String,
        router: String,
        label: String,
    },

    /// A node step or router failed; `source` is the step's own error, unchanged.
    #[error("step `{step}` failed at node `{node}`: {source}")]
    StepInvocationFailure {
        node: String,
        step: String,
        #[source]
        source: StepError,
    },
}

impl ExecutionError {
    /// Node at which execution stopped.
    pub fn node(&self) -> &str {
        match self {
            Self::UnknownRoute { node, .. } | Self::StepInvocationFailure { node, .. } => node,
        }
    }
}
