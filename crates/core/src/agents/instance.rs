//! A configured agent: spec, model and tools.

use crate::agents::base::{Agent, AgentError, AgentEvent, AgentEventStream, ExecutionContext};
use crate::llm::{ChatMessage, LanguageModel, LlmChunk, ToolCall};
use crate::template::interpolate;
use crate::tools::ToolSet;
use async_trait::async_trait;
use ck_protocol::agent_models::AgentSpec;
use ck_protocol::crew_models::Inputs;
use std::fmt;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

pub const DEFAULT_MAX_ITER: u32 = 10;

/// An agent ready to run tasks.
///
/// Cheap to clone: the model and tools are shared.
#[derive(Clone)]
pub struct AgentInstance {
    spec: AgentSpec,
    llm: Arc<dyn LanguageModel>,
    tools: ToolSet,
    verbose: bool,
    max_iter: u32,
}

impl AgentInstance {
    pub fn new(spec: AgentSpec, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            spec,
            llm,
            tools: ToolSet::new(),
            verbose: false,
            max_iter: DEFAULT_MAX_ITER,
        }
    }

    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = max_iter;
        self
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    pub fn llm(&self) -> &Arc<dyn LanguageModel> {
        &self.llm
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn max_iter(&self) -> u32 {
        self.max_iter
    }

    /// Copy of this agent prepared for one run: placeholders in role, goal
    /// and backstory are filled from `inputs` and `shared` tools are added.
    pub fn prepared(&self, inputs: &Inputs, shared: &ToolSet) -> Self {
        let spec = AgentSpec {
            name: self.spec.name.clone(),
            role: interpolate(&self.spec.role, inputs),
            goal: interpolate(&self.spec.goal, inputs),
            backstory: interpolate(&self.spec.backstory, inputs),
        };
        Self {
            spec,
            tools: self.tools.merged(shared),
            ..self.clone()
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            "You are {}. {}\nYour personal goal is: {}",
            self.spec.role, self.spec.backstory, self.spec.goal
        )
    }
}

impl fmt::Debug for AgentInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentInstance")
            .field("spec", &self.spec)
            .field("model", &self.llm.model_id())
            .field("tools", &self.tools)
            .field("verbose", &self.verbose)
            .field("max_iter", &self.max_iter)
            .finish()
    }
}

#[async_trait]
impl Agent for AgentInstance {
    fn key(&self) -> &str {
        &self.spec.name
    }

    fn role(&self) -> &str {
        &self.spec.role
    }

    /// Run the chat/tool loop.
    ///
    /// Each model turn either answers or asks for tools. Tool results are fed
    /// back and the loop continues until a plain answer arrives or `max_iter`
    /// turns have been spent, in which case the last text seen is the answer.
    async fn execute(&self, context: &ExecutionContext) -> Result<AgentEventStream, AgentError> {
        let llm = self.llm.clone();
        let tools = self.tools.clone();
        let definitions = tools.definitions();
        let role = self.spec.role.clone();
        let verbose = self.verbose;
        let max_iter = self.max_iter.max(1);
        let mut messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(context.prompt()),
        ];

        let stream = async_stream::stream! {
            let mut last_text = String::new();

            for turn in 1..=max_iter {
                debug!(agent = %role, turn, "Calling model");
                let mut response = match llm.chat(messages.clone(), definitions.clone()).await {
                    Ok(response) => response,
                    Err(e) => {
                        yield Err(AgentError::from(e));
                        return;
                    }
                };

                let mut text = String::new();
                let mut calls: Vec<ToolCall> = Vec::new();
                while let Some(chunk) = response.next().await {
                    match chunk {
                        Ok(LlmChunk::Text(delta)) => {
                            text.push_str(&delta);
                            yield Ok(AgentEvent::MessageChunk(delta));
                        }
                        Ok(LlmChunk::ToolCalls(requested)) => calls.extend(requested),
                        Err(e) => {
                            yield Err(AgentError::from(e));
                            return;
                        }
                    }
                }

                if calls.is_empty() {
                    if verbose {
                        info!(agent = %role, chars = text.len(), "Final answer");
                    }
                    yield Ok(AgentEvent::Completed(text));
                    return;
                }

                if !text.trim().is_empty() {
                    yield Ok(AgentEvent::Thought(text.clone()));
                    last_text = text.clone();
                }
                messages.push(ChatMessage::assistant(text, calls.clone()));

                for call in calls {
                    if verbose {
                        info!(agent = %role, tool = %call.name, "Using tool");
                    }
                    yield Ok(AgentEvent::ToolCall(call.name.clone()));
                    let output = run_tool(&tools, &call).await;
                    messages.push(ChatMessage::tool(output));
                }
            }

            warn!(agent = %role, max_iter, "Iteration limit reached, using last answer");
            yield Ok(AgentEvent::Completed(last_text));
        };

        Ok(Box::pin(stream))
    }
}

/// Execute one requested tool call and render the outcome for the model.
///
/// Failures are reported back as text so the model can recover.
async fn run_tool(tools: &ToolSet, call: &ToolCall) -> String {
    let Some(tool) = tools.get(&call.name) else {
        warn!(tool = %call.name, "Model requested an unknown tool");
        return format!(
            "Error: tool '{}' does not exist. Available tools: {}",
            call.name,
            tools.names().join(", ")
        );
    };

    match tool.execute(call.arguments.clone()).await {
        Ok(result) if result.success => result.output,
        Ok(result) => format!("Error: {}", result.output),
        Err(e) => {
            warn!(tool = %call.name, "Tool failed: {e:#}");
            format!("Error: {e}")
        }
    }
}
