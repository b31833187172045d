//! Crew execution engine.
//!
//! The CrewEngine runs a crew's tasks strictly one after another, hands each
//! one to an agent (chosen by the crew manager in hierarchical mode), writes
//! every output to its file and records the run for replay.

pub mod delegation;
pub mod evaluation;
pub mod training;

use crate::agents::base::{Agent, AgentEvent, ExecutionContext};
use crate::agents::manager::AgentManager;
use crate::crew::{Crew, TaskInstance};
use crate::state::run::{
    complete_run, create_run, fail_run, log_to_run, record_task_output, start_run,
};
use crate::state::{EventSink, RunStore};
use crate::template::interpolate;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ck_protocol::config_models::ProcessKind;
use ck_protocol::crew_models::{CrewOutput, Inputs, TaskOutput};
use ck_protocol::events::Event;
use ck_protocol::process_models::RunRecord;
use delegation::Delegator;
use std::path::Path;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

/// Notified after each task output has been written.
#[async_trait]
pub trait TaskObserver: Send + Sync {
    async fn on_task_completed(&self, output: &TaskOutput) -> Result<()>;
}

/// Executes one crew run.
pub struct CrewEngine<'a> {
    crew: &'a Crew,
    events: EventSink,
    store: RunStore,
}

impl<'a> CrewEngine<'a> {
    pub fn new(crew: &'a Crew, events: EventSink) -> Self {
        Self {
            crew,
            events,
            store: crew.run_store(),
        }
    }

    /// Run every task with the given (already hooked) inputs.
    pub async fn run(
        &self,
        inputs: &Inputs,
        observer: Option<&dyn TaskObserver>,
    ) -> Result<CrewOutput> {
        self.run_from(inputs, 0, Vec::new(), observer).await
    }

    /// Re-run the latest run from one of its tasks.
    ///
    /// `task_id` is a task id from the latest run record or a task name.
    /// Outputs of the tasks before it are taken from the record and used as
    /// context, and the stored inputs are reused.
    pub async fn replay(&self, task_id: &str) -> Result<CrewOutput> {
        let record = self.store.load_latest()?.ok_or_else(|| {
            anyhow!(
                "No previous run found at {}; run the crew first",
                self.store.path().display()
            )
        })?;

        let task_name = record
            .tasks_output
            .iter()
            .find(|o| o.task_id.to_string() == task_id || o.task_name == task_id)
            .map(|o| o.task_name.clone())
            .or_else(|| self.crew.task(task_id).map(|t| t.name().to_string()))
            .ok_or_else(|| anyhow!("Task '{task_id}' not found in the latest run"))?;

        let start = self
            .crew
            .tasks()
            .iter()
            .position(|t| t.name() == task_name)
            .ok_or_else(|| anyhow!("Task '{task_name}' is not part of this crew"))?;

        let prior = self.crew.tasks()[..start]
            .iter()
            .map(|t| {
                record
                    .tasks_output
                    .iter()
                    .find(|o| o.task_name == t.name())
                    .cloned()
                    .ok_or_else(|| anyhow!("No stored output for earlier task '{}'", t.name()))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(task = %task_name, start, "Replaying crew");
        self.run_from(&record.inputs, start, prior, None).await
    }

    async fn run_from(
        &self,
        inputs: &Inputs,
        start: usize,
        prior: Vec<TaskOutput>,
        observer: Option<&dyn TaskObserver>,
    ) -> Result<CrewOutput> {
        let mut run = create_run(self.crew.name().to_string(), inputs.clone());
        run.tasks_output = prior;
        start_run(&mut run, &self.events, start).await;

        match self.execute_tasks(&mut run, inputs, start, observer).await {
            Ok(output) => {
                complete_run(&mut run, &self.events).await;
                self.store.save(&run)?;
                Ok(output)
            }
            Err(e) => {
                error!("Crew run failed: {e:#}");
                let index = run.tasks_output.len();
                fail_run(&mut run, &self.events, index, format!("{e:#}")).await;
                if let Err(save_err) = self.store.save(&run) {
                    warn!("Failed to save run record: {save_err:#}");
                }
                Err(e)
            }
        }
    }

    async fn execute_tasks(
        &self,
        run: &mut RunRecord,
        inputs: &Inputs,
        start: usize,
        observer: Option<&dyn TaskObserver>,
    ) -> Result<CrewOutput> {
        let crew = self.crew;
        let coworkers: AgentManager = crew
            .agents()
            .iter()
            .map(|a| Arc::new(a.prepared(inputs, crew.tools())) as Arc<dyn Agent>)
            .collect();

        let delegator = match crew.process() {
            ProcessKind::Sequential => None,
            ProcessKind::Hierarchical => {
                let llm = crew
                    .manager_llm()
                    .cloned()
                    .ok_or_else(|| anyhow!("Hierarchical process requires a manager LLM"))?;
                Some(Delegator::new(llm))
            }
        };

        for (index, task) in crew.tasks().iter().enumerate().skip(start) {
            self.events
                .emit(Event::RunStatusUpdate {
                    run_id: run.run_id,
                    status: run.status,
                    task_index: index,
                })
                .await;

            let output = self
                .execute_task(run, &coworkers, delegator.as_ref(), task, inputs)
                .await
                .with_context(|| format!("Task '{}' failed", task.name()))?;

            write_output(&output.output_file, &output.raw)?;
            record_task_output(run, &self.events, output.clone()).await;
            self.store.save(run)?;

            if let Some(observer) = observer {
                observer.on_task_completed(&output).await?;
            }
        }

        let raw = run
            .tasks_output
            .last()
            .map(|o| o.raw.clone())
            .unwrap_or_default();
        write_output(crew.output_file(), &raw)?;

        Ok(CrewOutput {
            raw,
            tasks_output: run.tasks_output.clone(),
        })
    }

    async fn execute_task(
        &self,
        run: &RunRecord,
        coworkers: &AgentManager,
        delegator: Option<&Delegator>,
        task: &TaskInstance,
        inputs: &Inputs,
    ) -> Result<TaskOutput> {
        let description = interpolate(&task.spec().description, inputs);
        let expected_output = interpolate(&task.spec().expected_output, inputs);

        let agent_key = match delegator {
            Some(delegator) => {
                let key = delegator
                    .delegate(coworkers, task, &description, &expected_output)
                    .await?;
                self.events
                    .emit(Event::TaskDelegated {
                        run_id: run.run_id,
                        task_name: task.name().to_string(),
                        coworker: key.clone(),
                    })
                    .await;
                key
            }
            None => task.agent_key().to_string(),
        };

        let agent_role = coworkers
            .get_agent(&agent_key)
            .map(|agent| agent.role().to_string())
            .ok_or_else(|| anyhow!("Agent '{agent_key}' is not part of this crew"))?;

        info!(task = task.name(), agent = %agent_role, "Starting task");
        self.events
            .emit(Event::TaskStarted {
                run_id: run.run_id,
                task_name: task.name().to_string(),
                agent_role: agent_role.clone(),
            })
            .await;

        let context = ExecutionContext::new(description.clone())
            .with_expected_output(expected_output)
            .with_context(run.tasks_output.iter().map(|o| o.raw.clone()).collect());

        let mut stream = coworkers.execute(&agent_key, &context).await?;
        let mut answer = None;
        while let Some(event) = stream.next().await {
            match event? {
                AgentEvent::Thought(thought) => {
                    log_to_run(run, &self.events, format!("[Thought] {thought}")).await;
                }
                AgentEvent::ToolCall(tool) => {
                    self.events
                        .emit(Event::ToolCalled {
                            run_id: run.run_id,
                            agent_role: agent_role.clone(),
                            tool,
                        })
                        .await;
                }
                AgentEvent::MessageChunk(chunk) => {
                    log_to_run(run, &self.events, chunk).await;
                }
                AgentEvent::Completed(text) => {
                    answer = Some(text);
                    break;
                }
            }
        }

        let raw = answer.ok_or_else(|| anyhow!("Agent '{agent_role}' finished without an answer"))?;
        info!(task = task.name(), chars = raw.len(), "Task completed");

        Ok(TaskOutput {
            task_id: task.id(),
            task_name: task.name().to_string(),
            agent_role,
            description,
            raw,
            output_file: task.output_file().to_path_buf(),
        })
    }
}

/// Write `content` to `path`, creating parent directories.
fn write_output(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}
