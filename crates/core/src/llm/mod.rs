//! Language model abstraction.
//!
//! Agents talk to models only through the [`LanguageModel`] trait. The real
//! implementation is [`ModelHandle`], bound to an Ollama endpoint; tests use
//! scripted implementations.

pub mod factory;
pub mod handle;

pub use factory::{ModelFactory, ModelKind, ModelProvider};
pub use handle::ModelHandle;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use thiserror::Error;
use tokio_stream::{Stream, StreamExt};

/// Speaker of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub name: String,
    pub arguments: serde_json::Value,
}

/// One message of a chat transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Tool calls carried by an assistant message.
    pub tool_calls: Vec<ToolCall>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool(content: impl Into<String>) -> Self {
        Self::new(Role::Tool, content)
    }

    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }
}

/// Tool description advertised to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object.
    pub parameters: serde_json::Value,
}

/// A piece of a model response.
#[derive(Debug, Clone, PartialEq)]
pub enum LlmChunk {
    /// Answer text (a delta when streaming, the whole text otherwise).
    Text(String),
    /// Tool calls the model wants executed before it continues.
    ToolCalls(Vec<ToolCall>),
}

/// Errors raised by model calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    /// The configured endpoint is not a valid URL.
    #[error("Invalid model endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// The request never got a response (connection refused, DNS, ...).
    #[error("Request to model server failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("Model server returned {status}: {body}")]
    Api { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("Failed to decode model response: {0}")]
    Stream(String),
}

pub type LlmResult<T> = Result<T, LlmError>;

/// Stream of response pieces returned by [`LanguageModel::chat`].
pub type LlmStream = Pin<Box<dyn Stream<Item = LlmResult<LlmChunk>> + Send>>;

/// A chat-capable language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Identifier of the model on its server (e.g. `llama3.2`).
    fn model_id(&self) -> &str;

    /// Send a transcript and receive the response as a stream of chunks.
    ///
    /// `tools` may be empty, in which case the model cannot request calls.
    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
    ) -> LlmResult<LlmStream>;
}

/// Run a tool-less chat and collect the answer text.
pub async fn complete(model: &dyn LanguageModel, messages: Vec<ChatMessage>) -> LlmResult<String> {
    let mut stream = model.chat(messages, Vec::new()).await?;
    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        if let LlmChunk::Text(delta) = chunk? {
            text.push_str(&delta);
        }
    }
    Ok(text)
}
