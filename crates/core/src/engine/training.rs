//! Human feedback collection for `crew train`.

use super::TaskObserver;
use anyhow::{Context, Result};
use async_trait::async_trait;
use ck_protocol::crew_models::TaskOutput;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Source of feedback on a task output (stdin in the CLI).
#[async_trait]
pub trait FeedbackProvider: Send + Sync {
    async fn feedback(&self, output: &TaskOutput) -> Result<String>;
}

/// One piece of feedback, as saved to the training file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingRecord {
    pub iteration: u32,
    pub task_name: String,
    pub agent_role: String,
    pub output: String,
    pub feedback: String,
}

/// Collects feedback for every task of one iteration.
pub struct FeedbackCollector<'a> {
    provider: &'a dyn FeedbackProvider,
    iteration: u32,
    records: Mutex<Vec<TrainingRecord>>,
}

impl<'a> FeedbackCollector<'a> {
    pub fn new(provider: &'a dyn FeedbackProvider, iteration: u32) -> Self {
        Self {
            provider,
            iteration,
            records: Mutex::new(Vec::new()),
        }
    }

    pub fn into_records(self) -> Vec<TrainingRecord> {
        self.records
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl<'a> TaskObserver for FeedbackCollector<'a> {
    async fn on_task_completed(&self, output: &TaskOutput) -> Result<()> {
        let feedback = self
            .provider
            .feedback(output)
            .await
            .with_context(|| format!("Failed to get feedback for '{}'", output.task_name))?;
        debug!(task = %output.task_name, chars = feedback.len(), "Feedback received");

        let record = TrainingRecord {
            iteration: self.iteration,
            task_name: output.task_name.clone(),
            agent_role: output.agent_role.clone(),
            output: output.raw.clone(),
            feedback,
        };
        self.records
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(record);
        Ok(())
    }
}

/// Save training records as pretty JSON, creating parent directories.
pub fn write_records(path: &Path, records: &[TrainingRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    std::fs::write(path, json)?;
    Ok(())
}
