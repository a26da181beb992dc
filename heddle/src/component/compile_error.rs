//! Per-component compile errors.
//!
//! A failure is confined to its component: the registry records it and keeps loading the rest.
//! It only surfaces when a flow references the component
//! ([`BuildError::UnknownComponent`](crate::graph::BuildError::UnknownComponent)).

use thiserror::Error;

/// Compiling one component failed.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("component `{component}` failed to compile: {reason}")]
pub struct CompileError {
    pub component: String,
    pub reason: CompileFailure,
}

impl CompileError {
    pub fn new(component: impl Into<String>, reason: CompileFailure) -> Self {
        Self {
            component: component.into(),
            reason,
        }
    }
}

/// Why a component did not compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileFailure {
    #[error("source is not valid TOML: {0}")]
    Syntax(String),

    #[error("source defines no function")]
    NoFunction,

    #[error("source defines more than one function: {}", .0.join(", "))]
    MultipleFunctions(Vec<String>),

    #[error("source defines `{found}` instead of the component's own name")]
    NameMismatch { found: String },

    /// Unknown `kind`, missing or unknown fields, or a value of the wrong type.
    #[error("invalid step definition: {0}")]
    InvalidDefinition(String),

    #[error("prompt `{0}` is not bound")]
    UnboundPrompt(String),

    /// The step renders a prompt, names none, and the component has no `prompt_id`.
    #[error("step needs a prompt but none is named and the component has no prompt_id")]
    MissingPrompt,

    #[error("model role `{0}` is not bound")]
    UnboundModel(String),

    #[error("a component with this name is already registered")]
    DuplicateName,
}
