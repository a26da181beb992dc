//! Step execution error types.
//!
//! Returned by [`Step::run`](crate::graph::Step::run), [`Router::route`](crate::graph::Router::route)
//! and [`LlmClient::invoke`](crate::llm::LlmClient::invoke). The executor wraps them in
//! [`ExecutionError::StepInvocationFailure`](crate::graph::ExecutionError) without altering them.

use thiserror::Error;

use crate::prompts::TemplateError;
use crate::state::StateError;

/// Failure raised inside one step (node or router).
#[derive(Debug, Error)]
pub enum StepError {
    /// A required state key was missing or held the wrong type.
    #[error(transparent)]
    State(#[from] StateError),

    /// Prompt rendering failed (e.g. a placeholder had no value).
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// The model call itself failed (transport, API error, empty reply).
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),

    /// The model replied, but not in the structured form the step requires.
    #[error("malformed model output: {reason}")]
    MalformedOutput { reason: String, content: String },

    /// Any other step failure.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: MalformedOutput display names the reason but not the raw reply.
    #[test]
    fn malformed_output_display() {
        let err = StepError::MalformedOutput {
            reason: "expected a JSON object".into(),
            content: "not json at all".into(),
        };
        let s = err.to_string();
        assert!(s.contains("malformed model output"), "{}", s);
        assert!(s.contains("expected a JSON object"), "{}", s);
        assert!(!s.contains("not json at all"), "{}", s);
    }

    /// **Scenario**: StateError converts transparently, keeping the key in the message.
    #[test]
    fn state_error_is_transparent() {
        let err: StepError = StateError::MissingKey("input".into()).into();
        assert!(err.to_string().contains("input"));
        assert!(matches!(err, StepError::State(StateError::MissingKey(_))));
    }
}
