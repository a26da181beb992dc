//! State graph: nodes + edges + conditional edges, compile and invoke.
//!
//! [`StateGraph`]: add nodes, set the entry point, add edges (use [`END`] as the exit target)
//! and at most one conditional edge block per source node, then `compile` into an immutable
//! [`CompiledStateGraph`] and `invoke` it with a state.

mod build_error;
mod compiled;
mod event;
mod execution_error;
mod fn_step;
mod logging;
mod router;
mod state_graph;
mod step;
mod visualization;

pub use build_error::BuildError;
pub use compiled::CompiledStateGraph;
pub use event::GraphEvent;
pub use execution_error::ExecutionError;
pub use fn_step::{FnRouter, FnStep};
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_route,
};
pub use router::{ConditionalEdges, NextEntry, Router};
pub use state_graph::{StateGraph, END};
pub use step::Step;
pub use visualization::{generate_dot, generate_text};
