//! Load configuration for Heddle from `$XDG_CONFIG_HOME/<app>/config.toml` and a project `.env`.
//!
//! [`load_and_apply`] sets environment variables with priority
//! **existing env > .env > XDG `[env]`**, and returns the `[models.<role>]` tables from the
//! same file so the caller can layer model settings on top (env still wins there).

mod dotenv;
mod xdg_toml;

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("xdg config path: {0}")]
    XdgPath(String),
    #[error("read xdg config: {0}")]
    XdgRead(std::io::Error),
    #[error("parse xdg toml: {0}")]
    XdgParse(#[from] toml::de::Error),
    #[error("read .env: {0}")]
    DotenvRead(std::io::Error),
}

/// One `[models.<role>]` table, e.g. `[models.main] model = "gpt-4o"`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelEntry {
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

/// Non-env parts of the config file, returned by [`load_and_apply`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FileConfig {
    /// Model role name (`reasoning`, `main`, ...) to its overrides.
    pub models: BTreeMap<String, ModelEntry>,
}

/// Applies `.env` and XDG `[env]` values for keys not already set in the process environment,
/// then returns the file's `[models]` tables.
///
/// * `app_name`: e.g. `"heddle"`; used for `~/.config/<app_name>/config.toml`.
/// * `dotenv_dir`: directory holding `.env`; `None` means the current directory.
pub fn load_and_apply(app_name: &str, dotenv_dir: Option<&Path>) -> Result<FileConfig, LoadError> {
    let file = xdg_toml::load(app_name)?;
    let dotenv_map = dotenv::load(dotenv_dir).map_err(LoadError::DotenvRead)?;

    let keys: HashSet<&String> = file.env.keys().chain(dotenv_map.keys()).collect();
    for key in keys {
        if std::env::var_os(key).is_some() {
            continue;
        }
        if let Some(value) = dotenv_map.get(key).or_else(|| file.env.get(key)) {
            std::env::set_var(key, value);
        }
    }

    Ok(FileConfig {
        models: file.models,
    })
}
