//! Configuration models that aggregate all settings.
//!
//! [`CrewConfig`] combines the global settings with the agent and task
//! documents into a single value handed to the assembler.

use ck_protocol::agent_models::AgentSpec;
use ck_protocol::config_models::GlobalConfig;
use ck_protocol::task_models::TaskSpec;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Relative location of the agents document inside a project.
pub const AGENTS_FILE: &str = "config/agents.yaml";

/// Relative location of the tasks document inside a project.
pub const TASKS_FILE: &str = "config/tasks.yaml";

/// Relative location of the global settings file inside a project.
pub const GLOBAL_FILE: &str = "crew.toml";

/// Unified crew configuration loaded from a project directory.
///
/// Any of the three sources may be missing; the maps are then empty and the
/// assembler substitutes its per-entry defaults.
///
/// # Example
///
/// ```rust,no_run
/// use ck_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} agents and {} tasks",
///          config.agents.len(),
///          config.tasks.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct CrewConfig {
    /// Project directory the documents were read from.
    pub root: PathBuf,

    /// Global settings from `crew.toml`.
    pub global: GlobalConfig,

    /// Agent entries from `config/agents.yaml`, keyed by agent name.
    pub agents: BTreeMap<String, AgentSpec>,

    /// Task entries from `config/tasks.yaml`, keyed by task name.
    pub tasks: BTreeMap<String, TaskSpec>,
}

impl CrewConfig {
    /// Results directory resolved against the project root.
    pub fn results_dir(&self) -> PathBuf {
        self.root.join(&self.global.results_dir)
    }
}
