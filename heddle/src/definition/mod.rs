//! Stored definitions: prompts, components and flows.
//!
//! [`FlowDefinition`] is the graph shape (JSON wire format); [`ComponentDefinition`] and
//! [`PromptRecord`] are the raw records a [`StepRegistry`](crate::StepRegistry) is loaded from.
//! [`DefinitionStore`] abstracts where they live.

mod component;
mod flow;
mod seed;
mod store;

pub use component::{ComponentDefinition, PromptRecord};
pub use flow::{ConditionalEdgesDecl, EdgeDecl, FlowDefinition, NodeDecl};
pub use seed::{DefinitionSeed, FlowRecord, SENTIMENT_ANALYSIS_FLOW};
pub use store::{DefinitionError, DefinitionStore, InMemoryDefinitionStore};
