//! Read `$XDG_CONFIG_HOME/<app>/config.toml`: the `[env]` table and `[models.<role>]` tables.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use serde::Deserialize;

use crate::{LoadError, ModelEntry};

/// Config home: `XDG_CONFIG_HOME` when set (any platform), else the platform config dir.
fn config_home() -> Result<PathBuf, LoadError> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir().ok_or_else(|| LoadError::XdgPath("no config directory for this platform".into()))
}

fn config_path(app_name: &str) -> Result<Option<PathBuf>, LoadError> {
    let path = config_home()?.join(app_name).join("config.toml");
    Ok(path.is_file().then_some(path))
}

#[derive(Deserialize, Default, Debug)]
pub(crate) struct ConfigFile {
    #[serde(default)]
    pub(crate) env: HashMap<String, String>,
    #[serde(default)]
    pub(crate) models: BTreeMap<String, ModelEntry>,
}

/// Parses the app's config file. A missing file yields an empty config.
pub(crate) fn load(app_name: &str) -> Result<ConfigFile, LoadError> {
    let Some(path) = config_path(app_name)? else {
        return Ok(ConfigFile::default());
    };
    let content = std::fs::read_to_string(&path).map_err(LoadError::XdgRead)?;
    Ok(toml::from_str(&content)?)
}
