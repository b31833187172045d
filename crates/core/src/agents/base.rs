//! Base Agent trait and supporting types.

use crate::llm::LlmError;
use async_trait::async_trait;
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::Stream;

/// Context information passed to agents during execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// The task description, placeholders already filled in.
    pub instruction: String,

    /// What the final answer should look like.
    pub expected_output: String,

    /// Outputs of earlier tasks the agent may build on.
    pub context: Vec<String>,
}

impl ExecutionContext {
    /// Create a new ExecutionContext with the given instruction.
    pub fn new(instruction: String) -> Self {
        Self {
            instruction,
            ..Self::default()
        }
    }

    /// Set the expected output criteria.
    pub fn with_expected_output(mut self, expected_output: String) -> Self {
        self.expected_output = expected_output;
        self
    }

    /// Add earlier outputs as context.
    pub fn with_context(mut self, context: Vec<String>) -> Self {
        self.context.extend(context);
        self
    }

    /// Render the user prompt sent to the model.
    pub fn prompt(&self) -> String {
        let mut prompt = format!("Current Task: {}", self.instruction);

        if !self.expected_output.is_empty() {
            prompt.push_str(&format!(
                "\n\nThis is the expected criteria for your final answer: {}\n\
                 You MUST return the actual complete content as the final answer, not a summary.",
                self.expected_output
            ));
        }

        let context: Vec<&str> = self
            .context
            .iter()
            .map(String::as_str)
            .filter(|c| !c.trim().is_empty())
            .collect();
        if !context.is_empty() {
            prompt.push_str("\n\nThis is the context you're working with:\n");
            prompt.push_str(&context.join("\n\n----------\n\n"));
        }

        prompt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    Thought(String),
    ToolCall(String),
    MessageChunk(String),
    /// The agent's final answer.
    Completed(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Agent not found: {0}")]
    NotFound(String),
    #[error("Model call failed: {0}")]
    Model(#[from] LlmError),
    #[error("Execution failed: {0}")]
    ExecutionError(String),
}

pub type AgentEventStream = Pin<Box<dyn Stream<Item = Result<AgentEvent, AgentError>> + Send>>;

#[async_trait]
pub trait Agent: Send + Sync {
    /// Registry key, e.g. `researcher`.
    fn key(&self) -> &str;

    /// Human readable role, e.g. `Senior Data Researcher`.
    fn role(&self) -> &str;

    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError>;
}
