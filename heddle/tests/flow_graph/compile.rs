//! Compiled components inside graphs: compile failures surfacing at build time, and model
//! replies that do not parse.

use std::sync::Arc;

use heddle::{
    BuildError, CompileFailure, ComponentDefinition, ExecutionError, FlowState, GraphBuilder,
    MockLlm, PromptRecord, StepBindings, StepError, StepRegistry, MAIN_ROLE, REASONING_ROLE,
};

use crate::common::sentiment_flow;

const ANALYZE: &str = r#"
[analyze_sentiment]
kind = "llm_json"
prompt = "prompt1"
model = "reasoning"
output = "analysis_result"

[analyze_sentiment.extract.sentiment]
field = "sentiment"
lowercase = true
"#;

const ROUTE: &str = r#"
[route_sentiment]
kind = "route"
key = "sentiment"
"#;

fn responder(name: &str, prompt_id: i64) -> ComponentDefinition {
    ComponentDefinition::new(
        name,
        format!(
            "[{}]\nkind = \"llm_text\"\nmodel = \"main\"\noutput = \"final_response\"\n",
            name
        ),
    )
    .with_prompt(prompt_id)
}

fn prompts() -> Vec<PromptRecord> {
    vec![
        PromptRecord::new(1, "Classify as JSON {{\"sentiment\": ...}}: {input}"),
        PromptRecord::new(2, "Positive: {input}"),
        PromptRecord::new(3, "Negative: {input}"),
    ]
}

fn bindings(analysis_reply: &str) -> StepBindings {
    StepBindings::new()
        .with_model(REASONING_ROLE, Arc::new(MockLlm::new(analysis_reply)))
        .with_model(MAIN_ROLE, Arc::new(MockLlm::new("Great!")))
}

fn registry(analyze_source: &str, analysis_reply: &str) -> StepRegistry {
    StepRegistry::load(
        prompts(),
        vec![
            ComponentDefinition::new("analyze_sentiment", analyze_source).with_prompt(1),
            responder("respond_positive", 2),
            responder("respond_negative", 3),
            ComponentDefinition::new("route_sentiment", ROUTE),
        ],
        &bindings(analysis_reply),
    )
}

/// **Scenario**: A source defining two functions fails to compile; the flow using it fails to
/// build with UnknownComponent carrying that compile error.
#[test]
fn two_function_source_fails_build_with_cause() {
    let two_functions = format!("{}\n[helper]\nkind = \"set\"\nvalues = {{}}\n", ANALYZE);
    let registry = registry(&two_functions, "{}");
    assert_eq!(registry.failures().len(), 1);
    assert_eq!(registry.failures()[0].component, "analyze_sentiment");

    match GraphBuilder::build(&sentiment_flow(), &registry) {
        Err(BuildError::UnknownComponent(unresolved)) => {
            assert_eq!(unresolved.name, "analyze_sentiment");
            let cause = unresolved.compile_error.expect("compile cause");
            assert!(matches!(cause.reason, CompileFailure::MultipleFunctions(_)));
        }
        other => panic!("expected UnknownComponent, got {:?}", other.err()),
    }
}

/// **Scenario**: A broken component that no flow references does not affect the build.
#[test]
fn unreferenced_broken_component_is_harmless() {
    let mut components = vec![
        ComponentDefinition::new("analyze_sentiment", ANALYZE).with_prompt(1),
        responder("respond_positive", 2),
        responder("respond_negative", 3),
        ComponentDefinition::new("route_sentiment", ROUTE),
    ];
    components.push(ComponentDefinition::new("unused", "not = [toml"));
    let registry = StepRegistry::load(prompts(), components, &bindings("{}"));
    assert_eq!(registry.failures().len(), 1);
    assert!(GraphBuilder::build(&sentiment_flow(), &registry).is_ok());
}

/// **Scenario**: Compiled components run end to end; the reply's sentiment is lowercased and routed.
#[tokio::test]
async fn compiled_flow_runs_with_mock_models() {
    let registry = registry(
        ANALYZE,
        "```json\n{\"sentiment\": \"POSITIVE\", \"reason\": \"enthusiastic\"}\n```",
    );
    let graph = GraphBuilder::build(&sentiment_flow(), &registry).unwrap();
    let out = graph.invoke(FlowState::new("I love this")).await.unwrap();
    assert_eq!(out.require_sentiment().unwrap(), "positive");
    assert_eq!(
        out.require_analysis_result().unwrap()["reason"],
        "enthusiastic"
    );
    assert_eq!(out.require_final_response().unwrap(), "Great!");
}

/// **Scenario**: A model reply that is not JSON fails the run at the analysis node, with no state.
#[tokio::test]
async fn non_json_reply_fails_at_analysis_node() {
    let registry = registry(ANALYZE, "Sure! The sentiment is positive.");
    let graph = GraphBuilder::build(&sentiment_flow(), &registry).unwrap();
    match graph.invoke(FlowState::new("I love this")).await {
        Err(ExecutionError::StepInvocationFailure { node, step, source }) => {
            assert_eq!(node, "analyze");
            assert_eq!(step, "analyze_sentiment");
            match source {
                StepError::MalformedOutput { content, .. } => {
                    assert_eq!(content, "Sure! The sentiment is positive.")
                }
                other => panic!("expected MalformedOutput, got {:?}", other),
            }
        }
        other => panic!("expected StepInvocationFailure, got {:?}", other),
    }
}
