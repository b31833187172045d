//! Progress events emitted by the crew engine.
//!
//! The engine sends these over a tokio channel so a front end (the CLI) can
//! render progress while tasks run.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::process_models::RunStatus;

/// Events sent from the engine to whoever listens.
///
/// Uses tagged enum serialization:
/// ```json
/// {
///   "type": "taskStarted",
///   "payload": {
///     "run_id": "uuid-here",
///     "task_name": "research_task",
///     "agent_role": "Senior Researcher"
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// A new run has been started.
    CrewStarted { run_id: Uuid, crew_name: String },

    /// The run's status has changed.
    RunStatusUpdate {
        run_id: Uuid,
        status: RunStatus,
        task_index: usize,
    },

    /// The manager handed a task to a coworker.
    TaskDelegated {
        run_id: Uuid,
        task_name: String,
        coworker: String,
    },

    /// A task began executing.
    TaskStarted {
        run_id: Uuid,
        task_name: String,
        agent_role: String,
    },

    /// An agent produced output text.
    AgentLogChunk { run_id: Uuid, content: String },

    /// An agent invoked a tool.
    ToolCalled {
        run_id: Uuid,
        agent_role: String,
        tool: String,
    },

    /// A task finished; its output has been written.
    TaskCompleted {
        run_id: Uuid,
        task_id: Uuid,
        task_name: String,
    },

    /// The whole crew finished successfully.
    CrewCompleted { run_id: Uuid },

    /// The run stopped on an error.
    CrewFailed { run_id: Uuid, error: String },
}
