//! Seed documents: a whole definition set in one JSON file.
//!
//! ```json
//! {
//!   "prompts": [{"id": 1, "template": "Sentence: {input}"}],
//!   "components": [{"name": "c", "source": "...", "prompt_id": 1, "is_executable": true}],
//!   "flows": [{"name": "f", "flow": {"entry_point": "a", "nodes": []}, "is_active": true}]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{ComponentDefinition, DefinitionError, InMemoryDefinitionStore, PromptRecord};

const SENTIMENT_ANALYSIS_SEED: &str = include_str!("../../seeds/sentiment_analysis.json");

/// Name of the flow in the bundled sentiment analysis seed.
pub const SENTIMENT_ANALYSIS_FLOW: &str = "sentiment_analysis_flow";

/// A stored flow row. `flow` is raw JSON (an object or a JSON string) and is validated on fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowRecord {
    pub name: String,
    pub flow: Value,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Full definition set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionSeed {
    #[serde(default)]
    pub prompts: Vec<PromptRecord>,
    #[serde(default)]
    pub components: Vec<ComponentDefinition>,
    #[serde(default)]
    pub flows: Vec<FlowRecord>,
}

impl DefinitionSeed {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl InMemoryDefinitionStore {
    /// Store holding the bundled sentiment analysis flow: three prompts, the
    /// `analyze_sentiment`, `respond_positive`, `respond_negative` and `route_sentiment`
    /// components, and the active flow [`SENTIMENT_ANALYSIS_FLOW`].
    pub fn sentiment_analysis() -> Result<Self, DefinitionError> {
        Self::from_seed_json(SENTIMENT_ANALYSIS_SEED)
    }
}
