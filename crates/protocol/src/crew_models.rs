//! Kickoff inputs and crew results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// A single kickoff input value.
///
/// Inputs are either plain text or a list of strings; the `untagged`
/// representation keeps the JSON/YAML form natural:
///
/// ```json
/// { "topic": "AI LLMs", "requirements": ["fast", "small"] }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum InputValue {
    Text(String),
    List(Vec<String>),
}

impl InputValue {
    /// Render the value the way it is substituted into a prompt.
    ///
    /// Lists become one `- item` line per entry.
    pub fn render(&self) -> String {
        match self {
            InputValue::Text(text) => text.clone(),
            InputValue::List(items) => items
                .iter()
                .map(|item| format!("- {item}"))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            InputValue::Text(text) => Some(text),
            InputValue::List(_) => None,
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        InputValue::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        InputValue::Text(value)
    }
}

impl From<Vec<String>> for InputValue {
    fn from(value: Vec<String>) -> Self {
        InputValue::List(value)
    }
}

/// Named inputs a crew is kicked off with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, InputValue>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<InputValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<InputValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&InputValue> {
        self.0.get(key)
    }

    /// The `topic` input, if it is plain text.
    pub fn topic(&self) -> Option<&str> {
        self.get("topic").and_then(InputValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &InputValue)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The result of a single task execution.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TaskOutput {
    /// Identifier of the task instance that produced this output.
    pub task_id: Uuid,

    /// Key of the task in `config/tasks.yaml`.
    pub task_name: String,

    /// Role of the agent that actually performed the task.
    pub agent_role: String,

    /// The task description after placeholder substitution.
    pub description: String,

    /// Final answer text of the agent.
    pub raw: String,

    /// Where the raw output was written.
    pub output_file: PathBuf,
}

/// The result of a whole crew run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct CrewOutput {
    /// Final answer of the crew: the raw output of its last task.
    pub raw: String,

    /// Outputs of every executed task, in execution order.
    pub tasks_output: Vec<TaskOutput>,
}

impl std::fmt::Display for CrewOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}
