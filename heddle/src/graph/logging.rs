//! Logging utilities for graph execution.
//!
//! Structured `tracing` events for run start/end, node execution and routing. Run-level events
//! are `info`/`error`; per-node events are `debug`.

use std::fmt::Debug;

use super::ExecutionError;

/// Log node execution start.
pub fn log_node_start(node: &str, step: &str) {
    tracing::debug!(node = node, step = step, "Starting node execution");
}

/// Log the state a node is about to receive.
pub fn log_node_state<S: Debug>(node: &str, state: &S) {
    tracing::trace!(node = node, state = ?state, "Node execution: state");
}

/// Log node execution completion.
pub fn log_node_complete(node: &str) {
    tracing::debug!(node = node, "Node execution complete");
}

/// Log a routing decision.
pub fn log_route(from: &str, label: &str, to: &str) {
    tracing::debug!(from = from, label = label, to = to, "conditional routing");
}

/// Log graph execution start.
pub fn log_graph_start(entry_point: &str) {
    tracing::info!(entry_point = entry_point, "Starting graph execution");
}

/// Log graph execution completion.
pub fn log_graph_complete(steps: usize) {
    tracing::info!(steps = steps, "Graph execution complete");
}

/// Log graph execution error.
pub fn log_graph_error(error: &ExecutionError) {
    tracing::error!(node = error.node(), %error, "Graph execution error");
}
