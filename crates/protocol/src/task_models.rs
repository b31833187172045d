//! Task configuration models for `config/tasks.yaml`.

use serde::{Deserialize, Serialize};

/// Represents one task entry of `config/tasks.yaml`.
///
/// # Example
///
/// ```yaml
/// research_task:
///   description: >
///     Conduct a thorough research about {topic}.
///   expected_output: >
///     A list with 10 bullet points of the most relevant information.
///   agent: researcher
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    /// The mapping key this entry was loaded from (e.g. `research_task`).
    #[serde(skip)]
    pub name: String,

    /// What has to be done. May contain `{placeholders}`.
    pub description: String,

    /// Description of the result the agent should hand back.
    pub expected_output: String,

    /// Key of the agent in `config/agents.yaml` that performs this task.
    ///
    /// When omitted, the task is bound to the agent it is paired with in the
    /// role registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

impl TaskSpec {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        expected_output: impl Into<String>,
        agent: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            expected_output: expected_output.into(),
            agent: Some(agent.into()),
        }
    }
}
