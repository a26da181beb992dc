//! Events emitted by [`CompiledStateGraph::stream`](super::CompiledStateGraph::stream).

use super::ExecutionError;

/// One observable step of a graph run.
#[derive(Debug)]
pub enum GraphEvent<S> {
    /// A node is about to run.
    NodeStart { node: String },
    /// A node finished; `state` is the state it returned.
    NodeEnd { node: String, state: S },
    /// A router picked `label`, which maps to `to` (a node or `END`).
    Routed {
        from: String,
        label: String,
        to: String,
    },
    /// The run reached `END`; final state. Always the last event of a successful run.
    Finished(S),
    /// The run aborted. Always the last event of a failed run.
    Failed(ExecutionError),
}

impl<S> GraphEvent<S> {
    /// Whether this event ends the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished(_) | Self::Failed(_))
    }
}
