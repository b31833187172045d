//! The crew: agents, tasks and how they are run.
//!
//! A [`Crew`] is built by the [`CrewAssembler`] and executed by the
//! [`CrewEngine`](crate::engine::CrewEngine). Its entry points mirror the
//! `crew` subcommands: kickoff, replay, train and test.

pub mod assembler;
pub mod error;
pub mod hooks;
pub mod task;

pub use assembler::CrewAssembler;
pub use error::{AssemblyError, AssemblyResult};
pub use hooks::{KickoffHooks, LoggingHooks};
pub use task::TaskInstance;

use crate::agents::AgentInstance;
use crate::engine::evaluation::{Evaluator, TestReport};
use crate::engine::training::{FeedbackCollector, FeedbackProvider, TrainingRecord};
use crate::engine::CrewEngine;
use crate::llm::LanguageModel;
use crate::state::{EventSink, RunStore};
use crate::tools::ToolSet;
use anyhow::{bail, Context, Result};
use ck_protocol::config_models::ProcessKind;
use ck_protocol::crew_models::{CrewOutput, Inputs};
use ck_protocol::process_models::RunRecord;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub struct Crew {
    name: String,
    agents: Vec<Arc<AgentInstance>>,
    tasks: Vec<TaskInstance>,
    process: ProcessKind,
    manager_llm: Option<Arc<dyn LanguageModel>>,
    tools: ToolSet,
    output_file: PathBuf,
    results_dir: PathBuf,
    verbose: bool,
    hooks: Arc<dyn KickoffHooks>,
}

impl Crew {
    pub fn new(
        name: impl Into<String>,
        agents: Vec<Arc<AgentInstance>>,
        tasks: Vec<TaskInstance>,
    ) -> Self {
        let results_dir = PathBuf::from("results");
        Self {
            name: name.into(),
            agents,
            tasks,
            process: ProcessKind::Sequential,
            manager_llm: None,
            tools: ToolSet::new(),
            output_file: results_dir.join(crate::agents::AGGREGATE_OUTPUT_FILE),
            results_dir,
            verbose: false,
            hooks: Arc::new(LoggingHooks),
        }
    }

    pub fn with_process(mut self, process: ProcessKind) -> Self {
        self.process = process;
        self
    }

    pub fn with_manager_llm(mut self, llm: Arc<dyn LanguageModel>) -> Self {
        self.manager_llm = Some(llm);
        self
    }

    /// Tools shared by every agent for the duration of a run.
    pub fn with_tools(mut self, tools: ToolSet) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_output_file(mut self, path: PathBuf) -> Self {
        self.output_file = path;
        self
    }

    /// Where run state (`.crew/latest_run.json`) is kept.
    pub fn with_results_dir(mut self, path: PathBuf) -> Self {
        self.results_dir = path;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn KickoffHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn agents(&self) -> &[Arc<AgentInstance>] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskInstance] {
        &self.tasks
    }

    pub fn process(&self) -> ProcessKind {
        self.process
    }

    pub fn manager_llm(&self) -> Option<&Arc<dyn LanguageModel>> {
        self.manager_llm.as_ref()
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn agent(&self, key: &str) -> Option<&Arc<AgentInstance>> {
        self.agents.iter().find(|a| a.spec().name == key)
    }

    pub fn task(&self, name: &str) -> Option<&TaskInstance> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    pub fn run_store(&self) -> RunStore {
        RunStore::new(&self.results_dir)
    }

    /// The record of the most recent run, if any.
    pub fn latest_run(&self) -> Result<Option<RunRecord>> {
        self.run_store().load_latest()
    }

    /// Run every task once.
    ///
    /// The before hook sees the inputs first and its result is what the tasks
    /// are interpolated with. The after hook only sees a successful output.
    pub async fn kickoff(&self, inputs: Inputs, events: EventSink) -> Result<CrewOutput> {
        let inputs = self.hooks.before_kickoff(inputs)?;
        let output = CrewEngine::new(self, events).run(&inputs, None).await?;
        self.hooks.after_kickoff(output)
    }

    /// Re-run the latest run starting at `task_id` (a task id or task name).
    pub async fn replay(&self, task_id: &str, events: EventSink) -> Result<CrewOutput> {
        CrewEngine::new(self, events).replay(task_id).await
    }

    /// Kick off `iterations` times, asking `feedback` about every task output.
    ///
    /// All feedback is written as JSON to `filename`.
    pub async fn train(
        &self,
        iterations: u32,
        filename: &Path,
        inputs: Inputs,
        feedback: &dyn FeedbackProvider,
        events: EventSink,
    ) -> Result<Vec<TrainingRecord>> {
        if iterations == 0 {
            bail!("Number of iterations must be at least 1");
        }

        let mut records = Vec::new();
        for iteration in 1..=iterations {
            info!(iteration, iterations, "Training iteration");
            let collector = FeedbackCollector::new(feedback, iteration);
            let inputs = self.hooks.before_kickoff(inputs.clone())?;
            let output = CrewEngine::new(self, events.clone())
                .run(&inputs, Some(&collector))
                .await?;
            self.hooks.after_kickoff(output)?;
            records.extend(collector.into_records());
        }

        crate::engine::training::write_records(filename, &records)
            .with_context(|| format!("Failed to save training data to {}", filename.display()))?;
        Ok(records)
    }

    /// Kick off `iterations` times and let `judge` score every task output.
    pub async fn test(
        &self,
        iterations: u32,
        judge: Arc<dyn LanguageModel>,
        inputs: Inputs,
        events: EventSink,
    ) -> Result<TestReport> {
        if iterations == 0 {
            bail!("Number of iterations must be at least 1");
        }

        let evaluator = Evaluator::new(judge);
        let mut report = TestReport::new(evaluator.model_id(), iterations);
        for iteration in 1..=iterations {
            info!(iteration, iterations, "Test iteration");
            let inputs = self.hooks.before_kickoff(inputs.clone())?;
            let output = CrewEngine::new(self, events.clone()).run(&inputs, None).await?;
            let output = self.hooks.after_kickoff(output)?;

            for task_output in &output.tasks_output {
                let expected = self
                    .task(&task_output.task_name)
                    .map(|t| crate::template::interpolate(&t.spec().expected_output, &inputs))
                    .unwrap_or_default();
                let score = evaluator.score(task_output, &expected).await?;
                report.record(iteration, &task_output.task_name, score);
            }
        }
        Ok(report)
    }
}

impl fmt::Debug for Crew {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crew")
            .field("name", &self.name)
            .field("agents", &self.agents)
            .field("tasks", &self.tasks)
            .field("process", &self.process)
            .field("manager_llm", &self.manager_llm.as_ref().map(|m| m.model_id().to_string()))
            .field("tools", &self.tools)
            .field("output_file", &self.output_file)
            .finish()
    }
}
