//! Hierarchical mode: a manager agent picks the coworker for each task.

use crate::agents::base::{Agent, AgentEvent, ExecutionContext};
use crate::agents::instance::AgentInstance;
use crate::agents::manager::AgentManager;
use crate::crew::TaskInstance;
use crate::llm::LanguageModel;
use anyhow::{anyhow, Result};
use ck_protocol::agent_models::AgentSpec;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{info, warn};

pub const MANAGER_ROLE: &str = "Crew Manager";

/// Wraps the manager agent.
pub struct Delegator {
    manager: AgentInstance,
}

impl Delegator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        let spec = AgentSpec::new(
            "crew_manager",
            MANAGER_ROLE,
            "Manage the team to complete each task in the best way possible",
            "You are a seasoned manager with a knack for getting the best out of your team. \
             You decide which coworker is best suited for every task.",
        );
        // No tools: the manager only answers with a name.
        Self {
            manager: AgentInstance::new(spec, llm).with_max_iter(1),
        }
    }

    /// Ask the manager which coworker should run `task`; returns its key.
    ///
    /// A reply that names nobody falls back to the task's own agent.
    pub async fn delegate(
        &self,
        coworkers: &AgentManager,
        task: &TaskInstance,
        description: &str,
        expected_output: &str,
    ) -> Result<String> {
        let roster: Vec<String> = coworkers
            .iter()
            .map(|agent| format!("- {} (name: {})", agent.role(), agent.key()))
            .collect();

        let instruction = format!(
            "Choose the coworker who should perform the task below.\n\n\
             Coworkers:\n{}\n\n\
             Task: {description}\n\
             Expected output: {expected_output}\n\n\
             Reply with the coworker's name only.",
            roster.join("\n")
        );

        let mut stream = self
            .manager
            .execute(&ExecutionContext::new(instruction))
            .await?;
        let mut reply = None;
        while let Some(event) = stream.next().await {
            if let AgentEvent::Completed(text) = event? {
                reply = Some(text);
                break;
            }
        }
        let reply = reply.ok_or_else(|| anyhow!("{MANAGER_ROLE} gave no answer"))?;

        match coworkers.find_coworker(&reply) {
            Some(agent) => {
                info!(task = task.name(), coworker = agent.key(), "Task delegated");
                Ok(agent.key().to_string())
            }
            None => {
                warn!(
                    task = task.name(),
                    reply = %reply.trim(),
                    fallback = task.agent_key(),
                    "Manager named no known coworker, using the task's own agent"
                );
                Ok(task.agent_key().to_string())
            }
        }
    }
}
