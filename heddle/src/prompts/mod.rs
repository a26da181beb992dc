//! Prompt templates loaded from the definition store.
//!
//! See [`PromptTemplate`]. Steps render a template with the current state's
//! [`template_vars`](crate::FlowState::template_vars) before invoking a model.

mod template;

pub use template::{binding_name, PromptId, PromptTemplate, TemplateError};
