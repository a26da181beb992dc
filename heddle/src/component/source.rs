//! Component source text: one TOML table named after the function, with a `kind` field.
//!
//! ```toml
//! [respond_positive]
//! kind = "llm_text"
//! prompt = "prompt2"
//! model = "main"
//! output = "final_response"
//! ```
//!
//! Sources are data: the set of kinds is closed and nothing in them is executed.

use std::collections::BTreeMap;

use serde::Deserialize;

use super::CompileFailure;

/// Parsed step definition, one variant per kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum StepSpec {
    LlmJson(LlmJsonSpec),
    LlmText(LlmTextSpec),
    Render(RenderSpec),
    Set(SetSpec),
    Route(RouteSpec),
}

/// Render, invoke, parse the reply as a JSON object.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LlmJsonSpec {
    pub prompt: Option<String>,
    pub model: String,
    /// State key receiving the whole object.
    pub output: Option<String>,
    /// State key → field of the reply object.
    #[serde(default)]
    pub extract: BTreeMap<String, ExtractSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ExtractSpec {
    pub field: String,
    #[serde(default)]
    pub lowercase: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct LlmTextSpec {
    pub prompt: Option<String>,
    pub model: String,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RenderSpec {
    pub prompt: Option<String>,
    pub output: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SetSpec {
    pub values: BTreeMap<String, toml::Value>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RouteSpec {
    pub key: String,
    #[serde(default)]
    pub cases: BTreeMap<String, String>,
    pub default: Option<String>,
}

/// Parses `source`, checks it defines exactly one function named `name`, and returns its spec.
pub(crate) fn parse(name: &str, source: &str) -> Result<StepSpec, CompileFailure> {
    let table: toml::Table =
        toml::from_str(source).map_err(|e| CompileFailure::Syntax(e.to_string()))?;

    let mut functions = Vec::new();
    for (key, value) in table {
        match value {
            toml::Value::Table(body) => functions.push((key, body)),
            _ => {
                return Err(CompileFailure::InvalidDefinition(format!(
                    "top-level key `{}` is outside any function",
                    key
                )))
            }
        }
    }

    let (found, body) = match functions.len() {
        0 => return Err(CompileFailure::NoFunction),
        1 => functions.remove(0),
        _ => {
            return Err(CompileFailure::MultipleFunctions(
                functions.into_iter().map(|(k, _)| k).collect(),
            ))
        }
    };
    if found != name {
        return Err(CompileFailure::NameMismatch { found });
    }

    toml::Value::Table(body)
        .try_into()
        .map_err(|e: toml::de::Error| CompileFailure::InvalidDefinition(e.message().to_string()))
}
