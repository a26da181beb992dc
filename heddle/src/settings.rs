//! Model settings: which model serves each role, and how to reach the API.
//!
//! Layers, lowest first: built-in defaults (`reasoning` = `o1`, `main` = `gpt-4o` at
//! temperature 0.7), `[models.<role>]` tables from `$XDG_CONFIG_HOME/heddle/config.toml`, then
//! environment variables `HEDDLE_<ROLE>_MODEL` / `HEDDLE_<ROLE>_TEMPERATURE`. API access comes
//! from `OPENAI_API_KEY` and `OPENAI_BASE_URL`.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_openai::config::OpenAIConfig;
use env_config::FileConfig;
use thiserror::Error;

use crate::component::StepBindings;
use crate::llm::{ChatOpenAI, MAIN_ROLE, REASONING_ROLE};

/// App name used for the config directory.
pub const APP_NAME: &str = "heddle";

const API_KEY_ENV: &str = "OPENAI_API_KEY";
const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Config(#[from] env_config::LoadError),

    #[error("{key} must be a number, got {value:?}")]
    InvalidTemperature { key: String, value: String },

    /// A role declared in the config file has no model and no default.
    #[error("model role `{0}` has no model name")]
    MissingModel(String),
}

/// Model for one role.
#[derive(Clone, Debug, PartialEq)]
pub struct RoleModel {
    pub model: String,
    pub temperature: Option<f32>,
}

/// Explicit model configuration; turned into [`StepBindings`] with one client per role.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub roles: BTreeMap<String, RoleModel>,
}

impl Default for ModelSettings {
    fn default() -> Self {
        let roles = BTreeMap::from([
            (
                REASONING_ROLE.to_string(),
                RoleModel {
                    model: "o1".to_string(),
                    temperature: None,
                },
            ),
            (
                MAIN_ROLE.to_string(),
                RoleModel {
                    model: "gpt-4o".to_string(),
                    temperature: Some(0.7),
                },
            ),
        ]);
        Self {
            api_key: None,
            base_url: None,
            roles,
        }
    }
}

fn env_key(role: &str, field: &str) -> String {
    format!("HEDDLE_{}_{}", role.to_uppercase().replace('-', "_"), field)
}

impl ModelSettings {
    /// Layers `file` and then `lookup` (an environment reader) over the defaults.
    pub fn from_sources(
        file: &FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        for (role, entry) in &file.models {
            if let Some(existing) = settings.roles.get_mut(role) {
                if let Some(model) = &entry.model {
                    existing.model = model.clone();
                }
                if entry.temperature.is_some() {
                    existing.temperature = entry.temperature;
                }
                continue;
            }
            let Some(model) = &entry.model else {
                return Err(SettingsError::MissingModel(role.clone()));
            };
            settings.roles.insert(
                role.clone(),
                RoleModel {
                    model: model.clone(),
                    temperature: entry.temperature,
                },
            );
        }

        for (role, role_model) in settings.roles.iter_mut() {
            if let Some(model) = lookup(&env_key(role, "MODEL")).filter(|m| !m.is_empty()) {
                role_model.model = model;
            }
            let key = env_key(role, "TEMPERATURE");
            if let Some(value) = lookup(&key).filter(|v| !v.is_empty()) {
                let temperature = value
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| SettingsError::InvalidTemperature {
                        key: key.clone(),
                        value: value.clone(),
                    })?;
                role_model.temperature = Some(temperature);
            }
        }

        settings.api_key = lookup(API_KEY_ENV).filter(|v| !v.is_empty());
        settings.base_url = lookup(BASE_URL_ENV).filter(|v| !v.is_empty());
        Ok(settings)
    }

    /// Defaults overridden by the process environment only.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_sources(&FileConfig::default(), |key| std::env::var(key).ok())
    }

    /// Applies `.env` and the XDG config file to the environment, then layers everything.
    pub fn load(app_name: &str) -> Result<Self, SettingsError> {
        let file = env_config::load_and_apply(app_name, None)?;
        Self::from_sources(&file, |key| std::env::var(key).ok())
    }

    /// Model for `role`, if configured.
    pub fn role(&self, role: &str) -> Option<&RoleModel> {
        self.roles.get(role)
    }

    /// Bindings with a [`ChatOpenAI`] client per role and no prompts.
    pub fn into_bindings(self) -> StepBindings {
        let mut config = OpenAIConfig::new();
        if let Some(key) = &self.api_key {
            config = config.with_api_key(key);
        }
        if let Some(base) = &self.base_url {
            config = config.with_api_base(base);
        }
        let mut bindings = StepBindings::new();
        for (role, role_model) in self.roles {
            tracing::debug!(role = %role, model = %role_model.model, "binding model role");
            let mut client = ChatOpenAI::with_config(config.clone(), role_model.model);
            if let Some(t) = role_model.temperature {
                client = client.with_temperature(t);
            }
            bindings = bindings.with_model(role, Arc::new(client));
        }
        bindings
    }
}
