//! Shared fixtures: stub components for the sentiment flow and registry helpers.

use std::sync::Arc;

use heddle::{
    CompiledStep, FlowDefinition, FlowState, FnRouter, FnStep, StateError, StepError,
    StepRegistry,
};

pub const SENTIMENT_FLOW: &str = r#"{
  "entry_point": "analyze",
  "nodes": [
    {"name": "analyze", "component": "analyze_sentiment"},
    {"name": "positive_response", "component": "respond_positive"},
    {"name": "negative_response", "component": "respond_negative"}
  ],
  "edges": [
    {"from": "positive_response", "to": "__END__"},
    {"from": "negative_response", "to": "__END__"}
  ],
  "conditional_edges": {
    "from": "analyze",
    "router": "route_sentiment",
    "conditions": {
      "positive": "positive_response",
      "negative": "negative_response"
    }
  }
}"#;

pub fn sentiment_flow() -> FlowDefinition {
    FlowDefinition::from_json(SENTIMENT_FLOW).unwrap()
}

/// Node stub that sets `sentiment` to a fixed value.
pub fn set_sentiment(name: &str, sentiment: &'static str) -> CompiledStep {
    CompiledStep::Node(Arc::new(FnStep::new(name, move |mut s: FlowState| {
        s.sentiment = Some(sentiment.to_string());
        Ok(s)
    })))
}

/// Node stub that sets `final_response`.
pub fn respond(name: &str, reply: &'static str) -> CompiledStep {
    CompiledStep::Node(Arc::new(FnStep::new(name, move |mut s: FlowState| {
        s.final_response = Some(reply.to_string());
        Ok(s)
    })))
}

/// Router stub returning the current `sentiment` as the label.
pub fn route_on_sentiment(name: &str) -> CompiledStep {
    CompiledStep::Router(Arc::new(FnRouter::new(name, |s: &FlowState| {
        Ok(s.require_sentiment()?.to_string())
    })))
}

/// Node stub that always fails.
pub fn failing(name: &str, message: &'static str) -> CompiledStep {
    CompiledStep::Node(Arc::new(FnStep::new(name, move |_: FlowState| {
        Err(StepError::ExecutionFailed(message.to_string()))
    })))
}

/// Registry with the four sentiment components; `analyze_sentiment` sets `sentiment`.
pub fn sentiment_registry(sentiment: &'static str) -> StepRegistry {
    let mut registry = StepRegistry::new();
    registry
        .register_component("analyze_sentiment", set_sentiment("analyze_sentiment", sentiment))
        .unwrap();
    registry
        .register_component("respond_positive", respond("respond_positive", "Great!"))
        .unwrap();
    registry
        .register_component("respond_negative", respond("respond_negative", "Sorry to hear that."))
        .unwrap();
    registry
        .register_component("route_sentiment", route_on_sentiment("route_sentiment"))
        .unwrap();
    registry
}

#[allow(dead_code)]
pub fn missing_key(err: &StepError) -> Option<&str> {
    match err {
        StepError::State(StateError::MissingKey(key)) => Some(key),
        _ => None,
    }
}
