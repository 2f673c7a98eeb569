//! Configuration file upgrades: fill in keys added by newer releases.

use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn defaults_mapping() -> AppResult<Mapping> {
    let value = serde_yaml::to_value(Config::default()).map_err(|_| AppError::ConfigSave)?;
    value
        .as_mapping()
        .cloned()
        .ok_or_else(|| AppError::Config("default configuration is not a mapping".to_string()))
}

fn parse_mapping(content: &str) -> AppResult<Mapping> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| AppError::Config(format!("cannot parse configuration: {e}")))?;
    match value {
        Value::Mapping(m) => Ok(m),
        Value::Null => Ok(Mapping::new()),
        _ => Err(AppError::Config(
            "configuration root must be a mapping".to_string(),
        )),
    }
}

/// Top-level keys known to this version but absent from `content`.
pub fn missing_fields(content: &str) -> AppResult<Vec<String>> {
    let current = parse_mapping(content)?;
    let defaults = defaults_mapping()?;

    Ok(defaults
        .keys()
        .filter(|k| !current.contains_key(*k))
        .filter_map(|k| k.as_str().map(str::to_string))
        .collect())
}

/// Add missing keys with their default values, keeping every existing
/// value untouched. Returns the upgraded YAML, or `None` when nothing was
/// missing.
pub fn upgrade_content(content: &str) -> AppResult<Option<String>> {
    let mut current = parse_mapping(content)?;
    let defaults = defaults_mapping()?;
    let mut changed = false;

    for (key, value) in defaults {
        if !current.contains_key(&key) {
            current.insert(key, value);
            changed = true;
        }
    }

    if !changed {
        return Ok(None);
    }

    serde_yaml::to_string(&Value::Mapping(current))
        .map(Some)
        .map_err(|_| AppError::ConfigSave)
}

/// Upgrade the configuration file in place.
pub fn run_config_migration(path: &Path) -> AppResult<bool> {
    if !path.exists() {
        info(format!("No configuration file at {}", path.display()));
        return Ok(false);
    }

    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    match upgrade_content(&content)? {
        Some(upgraded) => {
            fs::write(path, upgraded).map_err(|_| AppError::ConfigSave)?;
            success(format!("Configuration upgraded: {}", path.display()));
            Ok(true)
        }
        None => {
            info("Configuration is already up to date.");
            Ok(false)
        }
    }
}
