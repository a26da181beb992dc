//! Flow definition: the declarative graph shape and its JSON wire format.
//!
//! ```json
//! {
//!   "entry_point": "analyze",
//!   "nodes": [{"name": "analyze", "component": "analyze_sentiment"}],
//!   "edges": [{"from": "analyze", "to": "__END__"}],
//!   "conditional_edges": null
//! }
//! ```
//!
//! Parsing only checks the shape; references are validated by
//! [`GraphBuilder`](crate::GraphBuilder).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One node: a graph-local name bound to a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDecl {
    pub name: String,
    pub component: String,
}

/// A plain edge. `to` may be `"__END__"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDecl {
    pub from: String,
    pub to: String,
}

/// The conditional block: after `from` runs, `router` picks a label, `conditions` maps it to
/// the next node (or `"__END__"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalEdgesDecl {
    pub from: String,
    pub router: String,
    pub conditions: BTreeMap<String, String>,
}

/// Declarative description of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowDefinition {
    pub entry_point: String,
    pub nodes: Vec<NodeDecl>,
    #[serde(default)]
    pub edges: Vec<EdgeDecl>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_edges: Option<ConditionalEdgesDecl>,
}

impl FlowDefinition {
    /// Parses the JSON wire format.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Component names referenced by nodes and the router, in declaration order.
    pub fn referenced_components(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let router = self.conditional_edges.as_ref().map(|c| c.router.as_str());
        for name in self
            .nodes
            .iter()
            .map(|n| n.component.as_str())
            .chain(router)
        {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
