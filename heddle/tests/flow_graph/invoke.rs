//! Execution semantics with stub components.

use std::collections::BTreeMap;
use std::sync::Arc;

use heddle::{
    ExecutionError, FlowState, GraphBuilder, StateGraph, StepError, StepRegistry, END,
};

use crate::common::{failing, missing_key, sentiment_flow, sentiment_registry};

/// **Scenario**: Positive input runs analyze → positive_response and ends with the expected state.
#[tokio::test]
async fn positive_sentiment_reaches_positive_response() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("positive")).unwrap();
    let out = graph.invoke(FlowState::new("I love this")).await.unwrap();

    let expected = FlowState::new("I love this")
        .with("sentiment", "positive")
        .unwrap()
        .with("final_response", "Great!")
        .unwrap();
    assert_eq!(out, expected);
    assert!(out.analysis_result.is_none());
}

#[tokio::test]
async fn negative_sentiment_reaches_negative_response() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("negative")).unwrap();
    let out = graph.invoke(FlowState::new("This is awful")).await.unwrap();
    assert_eq!(out.require_final_response().unwrap(), "Sorry to hear that.");
}

/// **Scenario**: A router label with no entry in the conditions map is UnknownRoute naming it.
#[tokio::test]
async fn unmapped_label_is_unknown_route() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("angry")).unwrap();
    match graph.invoke(FlowState::new("grr")).await {
        Err(ExecutionError::UnknownRoute {
            node,
            router,
            label,
        }) => {
            assert_eq!(node, "analyze");
            assert_eq!(router, "route_sentiment");
            assert_eq!(label, "angry");
        }
        other => panic!("expected UnknownRoute, got {:?}", other),
    }
}

/// **Scenario**: A failing node aborts the run; the error names the node and keeps the cause.
#[tokio::test]
async fn node_failure_names_node_and_keeps_cause() {
    let mut registry = StepRegistry::new();
    registry
        .register_component("analyze_sentiment", failing("analyze_sentiment", "boom"))
        .unwrap();
    for (name, step) in [
        ("respond_positive", crate::common::respond("respond_positive", "x")),
        ("respond_negative", crate::common::respond("respond_negative", "y")),
        ("route_sentiment", crate::common::route_on_sentiment("route_sentiment")),
    ] {
        registry.register_component(name, step).unwrap();
    }
    let graph = GraphBuilder::build(&sentiment_flow(), &registry).unwrap();
    match graph.invoke(FlowState::new("hi")).await {
        Err(ExecutionError::StepInvocationFailure { node, step, source }) => {
            assert_eq!(node, "analyze");
            assert_eq!(step, "analyze_sentiment");
            assert!(matches!(source, StepError::ExecutionFailed(m) if m == "boom"));
        }
        other => panic!("expected StepInvocationFailure, got {:?}", other),
    }
}

/// **Scenario**: A router failure is reported against the router's source node.
#[tokio::test]
async fn router_failure_is_step_invocation_failure() {
    let mut registry = sentiment_registry("positive");
    let mut flow = sentiment_flow();
    registry
        .register_component("noop", crate::common::respond("noop", "unused"))
        .unwrap();
    // `noop` never sets `sentiment`, so the router's required read fails.
    flow.nodes[0].component = "noop".into();
    let graph = GraphBuilder::build(&flow, &registry).unwrap();
    match graph.invoke(FlowState::new("hi")).await {
        Err(ExecutionError::StepInvocationFailure { node, step, source }) => {
            assert_eq!(node, "analyze");
            assert_eq!(step, "route_sentiment");
            assert_eq!(missing_key(&source), Some("sentiment"));
        }
        other => panic!("expected StepInvocationFailure, got {:?}", other),
    }
}

/// **Scenario**: Same graph, value-equal initial states, deterministic steps → equal results.
#[tokio::test]
async fn repeated_invocations_are_equal() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("positive")).unwrap();
    let first = graph.invoke(FlowState::new("I love this")).await.unwrap();
    let second = graph.invoke(FlowState::new("I love this")).await.unwrap();
    assert_eq!(first, second);
}

/// **Scenario**: Two builds from the same inputs are independent and behave the same.
#[tokio::test]
async fn two_builds_are_equivalent() {
    let registry = sentiment_registry("negative");
    let a = GraphBuilder::build(&sentiment_flow(), &registry).unwrap();
    let b = GraphBuilder::build(&sentiment_flow(), &registry).unwrap();
    drop(registry);
    assert_eq!(a.node_names(), b.node_names());
    assert_eq!(
        a.invoke(FlowState::new("meh")).await.unwrap(),
        b.invoke(FlowState::new("meh")).await.unwrap()
    );
}

/// **Scenario**: One compiled graph serves concurrent runs, each with its own state.
#[tokio::test]
async fn concurrent_invocations_share_one_graph() {
    let graph = GraphBuilder::build(&sentiment_flow(), &sentiment_registry("positive")).unwrap();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let graph = graph.clone();
            tokio::spawn(async move { graph.invoke(FlowState::new(format!("input {}", i))).await })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let out = handle.await.unwrap().unwrap();
        assert_eq!(out.require_input().unwrap(), format!("input {}", i));
        assert_eq!(out.require_final_response().unwrap(), "Great!");
    }
}

/// **Scenario**: The generic engine runs any state type, including loops that terminate.
#[tokio::test]
async fn generic_state_with_loop() {
    let mut graph = StateGraph::<u32>::new();
    graph
        .add_node("inc", Arc::new(heddle::FnStep::new("inc", |n: u32| Ok(n + 1))))
        .set_entry_point("inc")
        .add_conditional_edges(
            "inc",
            Arc::new(heddle::FnRouter::new("check", |n: &u32| {
                Ok(if *n < 3 { "again" } else { "done" }.to_string())
            })),
            BTreeMap::from([
                ("again".to_string(), "inc".to_string()),
                ("done".to_string(), END.to_string()),
            ]),
        );
    assert_eq!(graph.compile().unwrap().invoke(0).await.unwrap(), 3);
}
