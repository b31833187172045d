//! Global configuration models for `crew.toml`.
//!
//! Every field has a default, so a missing file or a partial file is valid.

use serde::Deserialize;
use serde::Serialize;

/// Default Ollama endpoint every model handle is bound to.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// How the engine decides which agent performs each task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProcessKind {
    /// Tasks run in order, each by the agent it is bound to.
    Sequential,

    /// A manager model picks the coworker for each task.
    #[default]
    Hierarchical,
}

/// Represents global settings from `crew.toml`.
///
/// # Example
///
/// ```toml
/// endpoint = "http://localhost:11434"
/// results_dir = "results"
/// process = "hierarchical"
/// verbose = true
/// max_iter = 10
/// stream = true
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GlobalConfig {
    /// Base URL of the inference server.
    pub endpoint: String,

    /// Directory that receives every report file.
    pub results_dir: String,

    /// Delegation mode of the assembled crew.
    pub process: ProcessKind,

    /// Whether agents log their intermediate output.
    pub verbose: bool,

    /// Upper bound on chat turns an agent may take for one task.
    pub max_iter: u32,

    /// Whether model handles request streamed responses.
    pub stream: bool,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            results_dir: "results".to_string(),
            process: ProcessKind::Hierarchical,
            verbose: true,
            max_iter: 10,
            stream: true,
        }
    }
}
