//! Runtime run-state models.
//!
//! A [`RunRecord`] is kept for each kickoff and persisted as the replay log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::crew_models::{Inputs, TaskOutput};

/// Represents the lifecycle status of a crew run.
///
/// Pending -> Running -> Completed | Failed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Run has been created but no task started yet.
    Pending,

    /// Tasks are executing.
    Running,

    /// Every task finished.
    Completed,

    /// A task or the manager returned an error.
    Failed,
}

/// Represents the state of a single crew run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunRecord {
    /// Unique identifier for this run.
    pub run_id: Uuid,

    /// Name of the crew that was kicked off.
    pub crew_name: String,

    /// Current execution status.
    pub status: RunStatus,

    /// Inputs after the before-kickoff hook ran.
    pub inputs: Inputs,

    /// Outputs of the tasks finished so far, in execution order.
    pub tasks_output: Vec<TaskOutput>,

    pub started_at: DateTime<Utc>,

    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}
