//! Streaming runs: event order and terminal events.

use heddle::{ExecutionError, FlowState, GraphBuilder, GraphEvent};
use tokio_stream::StreamExt;

use crate::common::{sentiment_flow, sentiment_registry};

#[tokio::test]
async fn stream_reports_nodes_route_and_final_state() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("negative")).unwrap();
    let events: Vec<GraphEvent<FlowState>> = graph.stream(FlowState::new("meh")).collect().await;

    let nodes: Vec<&str> = events
        .iter()
        .filter_map(|e| match e {
            GraphEvent::NodeEnd { node, .. } => Some(node.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(nodes, ["analyze", "negative_response"]);

    assert!(events.iter().any(|e| matches!(
        e,
        GraphEvent::Routed { from, label, to }
            if from == "analyze" && label == "negative" && to == "negative_response"
    )));
    match events.last() {
        Some(GraphEvent::Finished(state)) => {
            assert_eq!(state.require_final_response().unwrap(), "Sorry to hear that.")
        }
        other => panic!("expected Finished, got {:?}", other),
    }
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);
}

/// **Scenario**: A failing run streams the events up to the failure, then Failed.
#[tokio::test]
async fn stream_ends_with_failed() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("angry")).unwrap();
    let events: Vec<_> = graph.stream(FlowState::new("grr")).collect().await;
    assert!(matches!(events.first(), Some(GraphEvent::NodeStart { node }) if node == "analyze"));
    assert!(matches!(
        events.last(),
        Some(GraphEvent::Failed(ExecutionError::UnknownRoute { label, .. })) if label == "angry"
    ));
}
