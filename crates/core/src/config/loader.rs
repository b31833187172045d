//! Configuration file loader for a crew project directory.
//!
//! This module loads:
//! - `config/agents.yaml`: Agent entries
//! - `config/tasks.yaml`: Task entries
//! - `crew.toml`: Global settings
//!
//! A missing file is never an error: it is logged as a warning and treated as
//! empty. Malformed content always is.

use crate::config::error::ConfigError;
use crate::config::error::ConfigResult;
use crate::config::models::{CrewConfig, AGENTS_FILE, GLOBAL_FILE, TASKS_FILE};
use ck_protocol::agent_models::AgentSpec;
use ck_protocol::config_models::GlobalConfig;
use ck_protocol::task_models::TaskSpec;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Loads all configuration from a project directory.
///
/// # Arguments
///
/// * `root` - Project directory containing `config/` and `crew.toml`
///
/// # Returns
///
/// A `CrewConfig` with whatever was found. Missing files contribute empty
/// maps or default settings.
///
/// # Errors
///
/// Returns `ConfigError` if:
/// - A file exists but cannot be read
/// - A file has invalid YAML or TOML syntax
/// - An entry lacks a required field
///
/// # Example
///
/// ```rust,no_run
/// use ck_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} agents", config.agents.len());
/// # Ok(())
/// # }
/// ```
pub async fn load_config(root: &Path) -> ConfigResult<CrewConfig> {
    let global = load_global_config(&root.join(GLOBAL_FILE))?;
    let agents = load_agent_specs(&root.join(AGENTS_FILE))?;
    let tasks = load_task_specs(&root.join(TASKS_FILE))?;

    Ok(CrewConfig {
        root: root.to_path_buf(),
        global,
        agents,
        tasks,
    })
}

/// Loads `config/agents.yaml`, filling each spec's `name` from its key.
pub fn load_agent_specs(path: &Path) -> ConfigResult<BTreeMap<String, AgentSpec>> {
    let mut agents: BTreeMap<String, AgentSpec> = load_yaml_mapping(path)?;
    for (name, spec) in agents.iter_mut() {
        spec.name = name.clone();
    }
    Ok(agents)
}

/// Loads `config/tasks.yaml`, filling each spec's `name` from its key.
pub fn load_task_specs(path: &Path) -> ConfigResult<BTreeMap<String, TaskSpec>> {
    let mut tasks: BTreeMap<String, TaskSpec> = load_yaml_mapping(path)?;
    for (name, spec) in tasks.iter_mut() {
        spec.name = name.clone();
    }
    Ok(tasks)
}

/// Parses a YAML document as a mapping from string keys to `T`.
///
/// A missing file, an empty file and a comment-only file all yield an empty
/// mapping.
pub fn load_yaml_mapping<T>(path: &Path) -> ConfigResult<BTreeMap<String, T>>
where
    T: DeserializeOwned,
{
    let Some(content) = read_optional(path)? else {
        return Ok(BTreeMap::new());
    };

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|source| ConfigError::YamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        serde_yaml::Value::Null => Ok(BTreeMap::new()),
        serde_yaml::Value::Mapping(_) => {
            serde_yaml::from_value(value).map_err(|source| ConfigError::YamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(ConfigError::InvalidConfig {
            path: path.to_path_buf(),
            reason: "top-level document must be a mapping".to_string(),
        }),
    }
}

/// Loads global settings from `crew.toml`.
fn load_global_config(path: &Path) -> ConfigResult<GlobalConfig> {
    let Some(content) = read_optional(path)? else {
        return Ok(GlobalConfig::default());
    };

    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> ConfigResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "Loaded config file");
            Ok(Some(content))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Config file not found, using defaults");
            Ok(None)
        }
        Err(source) => Err(ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
