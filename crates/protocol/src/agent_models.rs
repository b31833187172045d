//! Agent configuration models for `config/agents.yaml`.
//!
//! The agents document is a single YAML mapping from agent key to its
//! role, goal and backstory.

use serde::{Deserialize, Serialize};

/// Represents one agent entry of `config/agents.yaml`.
///
/// # Example
///
/// ```yaml
/// researcher:
///   role: Senior Researcher
///   goal: Uncover cutting-edge developments in {topic}
///   backstory: >
///     You're a seasoned researcher with a knack for uncovering the latest
///     developments in {topic}.
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct AgentSpec {
    /// The mapping key this entry was loaded from (e.g. `researcher`).
    ///
    /// Not part of the YAML body; the loader fills it in from the key.
    #[serde(skip)]
    pub name: String,

    /// Short job title the model should act as.
    pub role: String,

    /// What the agent is trying to achieve. May contain `{placeholders}`.
    pub goal: String,

    /// Persona text prepended to every prompt the agent receives.
    pub backstory: String,
}

impl AgentSpec {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
        }
    }
}
