use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Recognized state keys.
pub mod keys {
    pub const INPUT: &str = "input";
    pub const SENTIMENT: &str = "sentiment";
    pub const ANALYSIS_RESULT: &str = "analysis_result";
    pub const FINAL_RESPONSE: &str = "final_response";
}

/// Accessing a state key failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("state key `{0}` is not set")]
    MissingKey(String),

    #[error("state key `{key}` must hold {expected}")]
    TypeMismatch { key: String, expected: &'static str },
}

/// Context threaded through one flow execution.
///
/// Steps read it, may add or overwrite keys, and return it; the executor replaces the
/// current state with whatever a step returns. Serializes as one flat JSON object.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlowState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_result: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_response: Option<String>,
    /// Keys outside the recognized set. Only written through [`set`](Self::set), so it never
    /// holds a recognized key.
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

fn string_or_null(key: &str, value: Value) -> Result<Option<String>, StateError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        _ => Err(StateError::TypeMismatch {
            key: key.to_string(),
            expected: "a string",
        }),
    }
}

impl FlowState {
    /// State with only `input` set; the usual starting point.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: Some(input.into()),
            ..Self::default()
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Result<Self, StateError> {
        self.set(key, value.into())?;
        Ok(self)
    }

    /// Returns a copy of the value under `key`, if set.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            keys::INPUT => self.input.clone().map(Value::String),
            keys::SENTIMENT => self.sentiment.clone().map(Value::String),
            keys::ANALYSIS_RESULT => self.analysis_result.clone().map(Value::Object),
            keys::FINAL_RESPONSE => self.final_response.clone().map(Value::String),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Keys outside the recognized set, with their values.
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Writes `value` under `key`. `null` clears the key.
    ///
    /// Recognized keys are type-checked: `analysis_result` takes an object, the others a string.
    pub fn set(&mut self, key: &str, value: Value) -> Result<(), StateError> {
        match key {
            keys::INPUT => self.input = string_or_null(key, value)?,
            keys::SENTIMENT => self.sentiment = string_or_null(key, value)?,
            keys::FINAL_RESPONSE => self.final_response = string_or_null(key, value)?,
            keys::ANALYSIS_RESULT => {
                self.analysis_result = match value {
                    Value::Null => None,
                    Value::Object(map) => Some(map),
                    _ => {
                        return Err(StateError::TypeMismatch {
                            key: key.to_string(),
                            expected: "an object",
                        })
                    }
                }
            }
            _ => {
                if value.is_null() {
                    self.extra.remove(key);
                } else {
                    self.extra.insert(key.to_string(), value);
                }
            }
        }
        Ok(())
    }

    /// Whether `key` currently holds a value.
    pub fn contains(&self, key: &str) -> bool {
        match key {
            keys::INPUT => self.input.is_some(),
            keys::SENTIMENT => self.sentiment.is_some(),
            keys::ANALYSIS_RESULT => self.analysis_result.is_some(),
            keys::FINAL_RESPONSE => self.final_response.is_some(),
            _ => self.extra.contains_key(key),
        }
    }

    /// String value under `key`; fails if unset or not a string.
    pub fn require_str(&self, key: &str) -> Result<&str, StateError> {
        let missing = || StateError::MissingKey(key.to_string());
        match key {
            keys::INPUT => self.input.as_deref().ok_or_else(missing),
            keys::SENTIMENT => self.sentiment.as_deref().ok_or_else(missing),
            keys::FINAL_RESPONSE => self.final_response.as_deref().ok_or_else(missing),
            keys::ANALYSIS_RESULT => Err(StateError::TypeMismatch {
                key: key.to_string(),
                expected: "a string",
            }),
            _ => match self.extra.get(key) {
                None => Err(missing()),
                Some(Value::String(s)) => Ok(s),
                Some(_) => Err(StateError::TypeMismatch {
                    key: key.to_string(),
                    expected: "a string",
                }),
            },
        }
    }

    pub fn require_input(&self) -> Result<&str, StateError> {
        self.require_str(keys::INPUT)
    }

    pub fn require_sentiment(&self) -> Result<&str, StateError> {
        self.require_str(keys::SENTIMENT)
    }

    pub fn require_final_response(&self) -> Result<&str, StateError> {
        self.require_str(keys::FINAL_RESPONSE)
    }

    pub fn require_analysis_result(&self) -> Result<&Map<String, Value>, StateError> {
        self.analysis_result
            .as_ref()
            .ok_or_else(|| StateError::MissingKey(keys::ANALYSIS_RESULT.to_string()))
    }

    /// Every set key with its value rendered as text, for prompt templates.
    ///
    /// Strings are passed verbatim; other values as compact JSON.
    pub fn template_vars(&self) -> HashMap<String, String> {
        let mut vars = HashMap::new();
        for key in [keys::INPUT, keys::SENTIMENT, keys::ANALYSIS_RESULT, keys::FINAL_RESPONSE] {
            if let Some(value) = self.get(key) {
                vars.insert(key.to_string(), value_as_text(&value));
            }
        }
        for (key, value) in &self.extra {
            vars.insert(key.clone(), value_as_text(value));
        }
        vars
    }
}

/// Text form of a JSON value: strings unquoted, everything else as compact JSON.
pub(crate) fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
