//! Definition store: where prompts, components and flows come from.
//!
//! [`DefinitionStore`] is the seam to persistent storage; [`InMemoryDefinitionStore`] is the
//! bundled implementation, filled programmatically or from a seed document.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;

use super::seed::{DefinitionSeed, FlowRecord};
use super::{ComponentDefinition, FlowDefinition, PromptRecord};

/// Error loading definitions.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// No such record, or the flow exists but is inactive.
    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    /// A stored flow is not a valid flow definition.
    #[error("stored flow `{name}` is invalid: {source}")]
    InvalidFlow {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    /// A seed document could not be parsed.
    #[error("invalid seed document: {0}")]
    InvalidSeed(#[from] serde_json::Error),

    /// Backend failure (connection, query).
    #[error("definition store error: {0}")]
    Store(String),
}

/// Source of prompt, component and flow definitions.
///
/// **Interaction**: Read by [`FlowRunner`](crate::FlowRunner) once per build; nothing is cached
/// between builds.
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    async fn fetch_prompts(&self) -> Result<Vec<PromptRecord>, DefinitionError>;

    /// All components, executable or not.
    async fn fetch_components(&self) -> Result<Vec<ComponentDefinition>, DefinitionError>;

    /// The active flow named `name`. Missing or inactive flows are `NotFound`.
    async fn fetch_flow(&self, name: &str) -> Result<FlowDefinition, DefinitionError>;
}

#[derive(Debug, Clone)]
struct StoredFlow {
    flow: Value,
    is_active: bool,
}

#[derive(Debug, Default)]
struct Tables {
    prompts: Vec<PromptRecord>,
    components: Vec<ComponentDefinition>,
    flows: HashMap<String, StoredFlow>,
}

/// In-memory DefinitionStore. Not persistent.
///
/// Flows are kept as raw JSON, so a malformed flow is reported when it is fetched, the same
/// way a database-backed store would report it.
///
/// ## Example
///
/// ```rust,ignore
/// use heddle::definition::{DefinitionStore, InMemoryDefinitionStore};
///
/// let store = InMemoryDefinitionStore::sentiment_analysis()?;
/// let flow = store.fetch_flow("sentiment_analysis_flow").await?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryDefinitionStore {
    inner: Arc<RwLock<Tables>>,
}

impl InMemoryDefinitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a parsed seed document.
    pub fn from_seed(seed: DefinitionSeed) -> Self {
        let flows = seed
            .flows
            .into_iter()
            .map(|FlowRecord { name, flow, is_active }| (name, StoredFlow { flow, is_active }))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(Tables {
                prompts: seed.prompts,
                components: seed.components,
                flows,
            })),
        }
    }

    /// Builds a store from a JSON seed document (see [`DefinitionSeed`]).
    pub fn from_seed_json(json: &str) -> Result<Self, DefinitionError> {
        Ok(Self::from_seed(DefinitionSeed::from_json(json)?))
    }

    /// Appends a prompt record.
    pub async fn insert_prompt(&self, prompt: PromptRecord) {
        self.inner.write().await.prompts.push(prompt);
    }

    /// Appends a component record. Duplicate names are kept, as a table without a unique
    /// constraint would; the registry reports them.
    pub async fn insert_component(&self, component: ComponentDefinition) {
        self.inner.write().await.components.push(component);
    }

    /// Stores a flow, replacing any flow with the same name.
    pub async fn insert_flow(&self, name: impl Into<String>, flow: &FlowDefinition, is_active: bool) {
        let flow = serde_json::to_value(flow).unwrap_or(Value::Null);
        self.insert_raw_flow(name, flow, is_active).await;
    }

    /// Stores a flow as raw JSON without validating it.
    pub async fn insert_raw_flow(&self, name: impl Into<String>, flow: Value, is_active: bool) {
        self.inner
            .write()
            .await
            .flows
            .insert(name.into(), StoredFlow { flow, is_active });
    }

    /// Marks a stored flow active or inactive. Returns false if there is no such flow.
    pub async fn set_flow_active(&self, name: &str, is_active: bool) -> bool {
        match self.inner.write().await.flows.get_mut(name) {
            Some(stored) => {
                stored.is_active = is_active;
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl DefinitionStore for InMemoryDefinitionStore {
    async fn fetch_prompts(&self) -> Result<Vec<PromptRecord>, DefinitionError> {
        Ok(self.inner.read().await.prompts.clone())
    }

    async fn fetch_components(&self) -> Result<Vec<ComponentDefinition>, DefinitionError> {
        Ok(self.inner.read().await.components.clone())
    }

    async fn fetch_flow(&self, name: &str) -> Result<FlowDefinition, DefinitionError> {
        let stored = self
            .inner
            .read()
            .await
            .flows
            .get(name)
            .filter(|f| f.is_active)
            .cloned()
            .ok_or_else(|| DefinitionError::NotFound {
                kind: "flow",
                name: name.to_string(),
            })?;
        let parsed = match stored.flow {
            Value::String(text) => FlowDefinition::from_json(&text),
            other => serde_json::from_value(other),
        };
        parsed.map_err(|source| DefinitionError::InvalidFlow {
            name: name.to_string(),
            source,
        })
    }
}
