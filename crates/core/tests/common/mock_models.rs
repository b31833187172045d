//! Recording language models, a model provider and a search tool stand-in.

use async_trait::async_trait;
use ck_core::llm::{
    ChatMessage, LanguageModel, LlmChunk, LlmError, LlmResult, LlmStream, ModelKind,
    ModelProvider, Role, ToolDefinition,
};
use ck_core::tools::{Tool, ToolResult};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

type Responder = Box<dyn Fn(&[ChatMessage]) -> LlmResult<String> + Send + Sync>;

/// A model that answers through a closure and records every transcript.
pub struct RecordingModel {
    id: String,
    respond: Responder,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingModel {
    pub fn new<F>(id: &str, respond: F) -> Arc<Self>
    where
        F: Fn(&[ChatMessage]) -> LlmResult<String> + Send + Sync + 'static,
    {
        Arc::new(Self {
            id: id.to_string(),
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Answers `"<id> answered: <first line of the task prompt>"`.
    pub fn echo(id: &str) -> Arc<Self> {
        let owned = id.to_string();
        Self::new(id, move |messages| {
            Ok(format!("{owned} answered: {}", task_line(messages)))
        })
    }

    /// Every call fails as if the server were down.
    #[allow(dead_code)]
    pub fn failing(id: &str) -> Arc<Self> {
        Self::new(id, |_| Err(LlmError::Request("connection refused".to_string())))
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Transcripts received so far.
    #[allow(dead_code)]
    pub fn transcripts(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

/// First line of the last user message.
pub fn task_line(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .rev()
        .find(|m| m.role == Role::User)
        .and_then(|m| m.content.lines().next())
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl LanguageModel for RecordingModel {
    fn model_id(&self) -> &str {
        &self.id
    }

    async fn chat(
        &self,
        messages: Vec<ChatMessage>,
        _tools: Vec<ToolDefinition>,
    ) -> LlmResult<LlmStream> {
        let reply = (self.respond)(&messages);
        self.calls.lock().unwrap().push(messages);
        let text = reply?;
        Ok(Box::pin(tokio_stream::iter(vec![Ok(LlmChunk::Text(text))])))
    }
}

/// One recording model per [`ModelKind`].
pub struct MockProvider {
    pub general: Arc<RecordingModel>,
    pub reasoning: Arc<RecordingModel>,
    pub code: Arc<RecordingModel>,
}

impl MockProvider {
    pub fn echo() -> Self {
        Self {
            general: RecordingModel::echo("general"),
            reasoning: RecordingModel::echo("reasoning"),
            code: RecordingModel::echo("code"),
        }
    }

    /// Calls made across the three models.
    pub fn total_calls(&self) -> usize {
        self.general.call_count() + self.reasoning.call_count() + self.code.call_count()
    }
}

impl ModelProvider for MockProvider {
    fn model(&self, kind: ModelKind) -> Arc<dyn LanguageModel> {
        match kind {
            ModelKind::General => self.general.clone(),
            ModelKind::Reasoning => self.reasoning.clone(),
            ModelKind::Code => self.code.clone(),
        }
    }
}

/// Stands in for the web search tool without touching the network.
#[derive(Default)]
pub struct MockSearchTool {
    pub calls: AtomicUsize,
}

#[async_trait]
impl Tool for MockSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web"
    }

    fn parameters(&self) -> Value {
        json!({"type": "object", "properties": {"query": {"type": "string"}}, "required": ["query"]})
    }

    async fn execute(&self, params: Value) -> anyhow::Result<ToolResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let query = params["query"].as_str().unwrap_or_default();
        Ok(ToolResult::success(format!("Results for {query}")))
    }
}
