//! FlowRunner over the bundled sentiment seed with mock models.

use std::sync::Arc;

use heddle::{
    ComponentDefinition, DefinitionError, FlowError, FlowRunner, FlowState,
    InMemoryDefinitionStore, MockLlm, StepBindings, MAIN_ROLE, REASONING_ROLE,
    SENTIMENT_ANALYSIS_FLOW,
};

fn runner(analysis: Arc<MockLlm>, main: Arc<MockLlm>) -> (FlowRunner, InMemoryDefinitionStore) {
    let store = InMemoryDefinitionStore::sentiment_analysis().unwrap();
    let bindings = StepBindings::new()
        .with_model(REASONING_ROLE, analysis)
        .with_model(MAIN_ROLE, main);
    (FlowRunner::new(Arc::new(store.clone()), bindings), store)
}

/// **Scenario**: The bundled flow classifies, routes and responds; prompts are rendered from the
/// stored templates.
#[tokio::test]
async fn seed_flow_positive_path() {
    let analysis = Arc::new(MockLlm::new(r#"{"sentiment": "Positive", "reason": "praise"}"#));
    let main = Arc::new(MockLlm::new("Glad you like it!"));
    let (runner, _) = runner(analysis.clone(), main.clone());

    let input = "I absolutely love how intuitive the UI is.";
    let out = runner
        .run(SENTIMENT_ANALYSIS_FLOW, FlowState::new(input))
        .await
        .unwrap();

    assert_eq!(out.require_sentiment().unwrap(), "positive");
    assert_eq!(out.require_final_response().unwrap(), "Glad you like it!");
    assert_eq!(out.require_analysis_result().unwrap()["reason"], "praise");

    let analysis_prompt = &analysis.prompts()[0];
    assert!(analysis_prompt.contains(&format!("Sentence: {}", input)));
    assert!(analysis_prompt.contains("{ \n  \"sentiment\""), "{}", analysis_prompt);
    assert!(main.prompts()[0].contains("You said something positive"));
}

/// **Scenario**: Anything other than "positive" (here "neutral") takes the negative branch.
#[tokio::test]
async fn seed_flow_non_positive_goes_negative() {
    let analysis = Arc::new(MockLlm::new(r#"{"sentiment": "neutral", "reason": "flat"}"#));
    let main = Arc::new(MockLlm::new("I hear you."));
    let (runner, _) = runner(analysis, main.clone());
    let out = runner
        .run(SENTIMENT_ANALYSIS_FLOW, FlowState::new("It is fine."))
        .await
        .unwrap();
    assert_eq!(out.require_final_response().unwrap(), "I hear you.");
    assert!(main.prompts()[0].contains("You expressed something negative"));
}

#[tokio::test]
async fn inactive_or_missing_flow_is_not_found() {
    let (runner, store) = runner(Arc::new(MockLlm::new("{}")), Arc::new(MockLlm::new("")));
    assert!(matches!(
        runner.run("nope", FlowState::new("x")).await,
        Err(FlowError::Definition(DefinitionError::NotFound { .. }))
    ));

    store.set_flow_active(SENTIMENT_ANALYSIS_FLOW, false).await;
    assert!(matches!(
        runner.build(SENTIMENT_ANALYSIS_FLOW).await,
        Err(FlowError::Definition(DefinitionError::NotFound { .. }))
    ));
}

/// **Scenario**: Each build reads the store again, so a newly broken component shows up.
#[tokio::test]
async fn builds_see_store_changes() {
    let (runner, store) = runner(Arc::new(MockLlm::new("{}")), Arc::new(MockLlm::new("")));
    assert!(runner.build(SENTIMENT_ANALYSIS_FLOW).await.is_ok());
    let registry = runner.load_registry().await.unwrap();
    assert_eq!(registry.component_names().len(), 4);

    // A second `analyze_sentiment` is a duplicate, but the first still resolves.
    store
        .insert_component(ComponentDefinition::new("analyze_sentiment", "broken"))
        .await;
    let registry = runner.load_registry().await.unwrap();
    assert_eq!(registry.failures().len(), 1);
    assert!(runner.build(SENTIMENT_ANALYSIS_FLOW).await.is_ok());
}

/// **Scenario**: Model failure propagates as an execution error naming the node.
#[tokio::test]
async fn model_failure_surfaces_as_execution_error() {
    let (runner, _) = runner(
        Arc::new(MockLlm::failing("connection refused")),
        Arc::new(MockLlm::new("")),
    );
    match runner
        .run(SENTIMENT_ANALYSIS_FLOW, FlowState::new("hello"))
        .await
    {
        Err(FlowError::Execution(e)) => assert_eq!(e.node(), "analyze"),
        other => panic!("expected execution error, got {:?}", other),
    }
}
