//! Graph build error.
//!
//! Returned by [`StateGraph::compile`](super::StateGraph::compile) for structural problems and by
//! [`GraphBuilder::build`](crate::GraphBuilder::build) when a flow references components that
//! cannot be resolved. No partial graph is ever returned.

use thiserror::Error;

use crate::registry::UnresolvedComponent;

/// Error when building an executable graph from a definition.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A node or router component name has no compiled entry in the registry.
    #[error(transparent)]
    UnknownComponent(#[from] UnresolvedComponent),

    /// A router component was used as a node, or a node component as the router.
    #[error("component `{component}` is a {actual}, but `{usage}` needs a {expected}")]
    ComponentKindMismatch {
        component: String,
        usage: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// The same node name was declared twice.
    #[error("node declared more than once: {0}")]
    DuplicateNode(String),

    /// The entry point is not a declared node (or was never set).
    #[error("entry point is not a declared node: {0:?}")]
    InvalidEntryPoint(String),

    /// An edge or conditional block references a node that is not declared.
    #[error("edge {from} -> {to} references undeclared node `{missing}`")]
    DanglingEdge {
        from: String,
        to: String,
        missing: String,
    },

    /// A node has more than one plain outgoing edge.
    #[error("node has more than one outgoing edge: {0}")]
    MultipleSuccessors(String),

    /// A node has both a plain outgoing edge and a conditional edge block.
    #[error("node has both an edge and conditional edges: {0}")]
    ConflictingRouting(String),
}
