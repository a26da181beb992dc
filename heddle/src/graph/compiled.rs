//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds the node steps and, per node, how to pick the next
//! node. Every field is `Arc`-shared, so clones are cheap and several runs may use one graph
//! at the same time, each with its own state.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::Instrument;

use super::event::GraphEvent;
use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state, log_route,
};
use super::state_graph::END;
use super::{ExecutionError, NextEntry, Step};

/// Capacity of the event channel behind [`CompiledStateGraph::stream`].
const STREAM_BUFFER: usize = 32;

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Created by `StateGraph::compile()`. Runs from the entry point; after each node, follows its
/// plain edge, asks its router for a label, or stops when the node has no outgoing edge.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: Arc<HashMap<String, Arc<dyn Step<S>>>>,
    /// Node names in declaration order (for introspection and visualization).
    pub(super) node_order: Vec<String>,
    pub(super) entry_point: String,
    /// Map from node id to how to get next. Nodes without an entry end the run.
    pub(super) next_map: Arc<HashMap<String, NextEntry<S>>>,
}

impl<S> fmt::Debug for CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routing: BTreeMap<&str, String> = self
            .next_map
            .iter()
            .map(|(node, next)| {
                let route = match next {
                    NextEntry::Unconditional(to) => format!("-> {}", to),
                    NextEntry::Conditional(edges) => format!("? {}", edges.router_name()),
                };
                (node.as_str(), route)
            })
            .collect();
        f.debug_struct("CompiledStateGraph")
            .field("entry_point", &self.entry_point)
            .field("nodes", &self.node_order)
            .field("routing", &routing)
            .finish()
    }
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    /// Node names in declaration order.
    pub fn node_names(&self) -> &[String] {
        &self.node_order
    }

    pub fn contains_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    /// Name of the step bound to `node` (the component name for data-driven flows).
    pub fn step_name(&self, node: &str) -> Option<&str> {
        self.nodes.get(node).map(|step| step.name())
    }

    /// Routing after `node`; `None` when the node ends the run.
    pub fn next_entry(&self, node: &str) -> Option<&NextEntry<S>> {
        self.next_map.get(node)
    }

    /// Runs the graph with the given initial state and returns the final state.
    ///
    /// Steps run strictly one after another. The first failing step or router, or the first
    /// unmapped label, aborts the run; no partial state is returned.
    pub async fn invoke(&self, state: S) -> Result<S, ExecutionError> {
        let span = tracing::info_span!(
            "graph_run",
            run_id = %uuid::Uuid::new_v4(),
            entry_point = %self.entry_point
        );
        async move {
            let result = self.run_loop(state, None).await;
            if let Err(e) = &result {
                log_graph_error(e);
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Runs the graph on a spawned task and streams progress events.
    ///
    /// The stream ends with exactly one [`GraphEvent::Finished`] or [`GraphEvent::Failed`].
    /// Dropping the stream does not cancel the run; events sent after that are discarded.
    pub fn stream(&self, state: S) -> ReceiverStream<GraphEvent<S>> {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let graph = self.clone();
        let span = tracing::info_span!(
            "graph_run",
            run_id = %uuid::Uuid::new_v4(),
            entry_point = %self.entry_point
        );
        tokio::spawn(
            async move {
                let last = match graph.run_loop(state, Some(&tx)).await {
                    Ok(state) => GraphEvent::Finished(state),
                    Err(e) => {
                        log_graph_error(&e);
                        GraphEvent::Failed(e)
                    }
                };
                let _ = tx.send(last).await;
            }
            .instrument(span),
        );
        ReceiverStream::new(rx)
    }

    /// Shared run loop used by invoke() and stream(): steps through nodes until `END` or a
    /// node with no outgoing edge.
    async fn run_loop(
        &self,
        mut state: S,
        tx: Option<&mpsc::Sender<GraphEvent<S>>>,
    ) -> Result<S, ExecutionError> {
        log_graph_start(&self.entry_point);
        let mut current = self.entry_point.clone();
        let mut steps = 0usize;

        loop {
            let step = self
                .nodes
                .get(&current)
                .expect("compiled graph has all nodes")
                .clone();

            log_node_start(&current, step.name());
            log_node_state(&current, &state);
            if let Some(tx) = tx {
                let _ = tx
                    .send(GraphEvent::NodeStart {
                        node: current.clone(),
                    })
                    .await;
            }

            state = step
                .run(state)
                .await
                .map_err(|source| ExecutionError::StepInvocationFailure {
                    node: current.clone(),
                    step: step.name().to_string(),
                    source,
                })?;
            steps += 1;
            log_node_complete(&current);
            if let Some(tx) = tx {
                let _ = tx
                    .send(GraphEvent::NodeEnd {
                        node: current.clone(),
                        state: state.clone(),
                    })
                    .await;
            }

            let next = match self.next_map.get(&current) {
                None => END.to_string(),
                Some(NextEntry::Unconditional(to)) => to.clone(),
                Some(NextEntry::Conditional(edges)) => {
                    let label = edges.router.route(&state).await.map_err(|source| {
                        ExecutionError::StepInvocationFailure {
                            node: current.clone(),
                            step: edges.router_name().to_string(),
                            source,
                        }
                    })?;
                    let Some(to) = edges.target(&label) else {
                        return Err(ExecutionError::UnknownRoute {
                            node: current,
                            router: edges.router_name().to_string(),
                            label,
                        });
                    };
                    log_route(&current, &label, to);
                    if let Some(tx) = tx {
                        let _ = tx
                            .send(GraphEvent::Routed {
                                from: current.clone(),
                                label: label.clone(),
                                to: to.to_string(),
                            })
                            .await;
                    }
                    to.to_string()
                }
            };

            if next == END {
                log_graph_complete(steps);
                return Ok(state);
            }
            current = next;
        }
    }
}
