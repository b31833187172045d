//! Run state machine.
//!
//! This module provides functions for moving a `RunRecord` through its
//! lifecycle, emitting an event for every transition.

use ck_protocol::crew_models::{Inputs, TaskOutput};
use ck_protocol::events::Event;
use ck_protocol::process_models::{RunRecord, RunStatus};
use chrono::Utc;
use tokio::sync::mpsc::Sender;
use uuid::Uuid;

/// Optional destination for run events.
///
/// Sending never fails the run: a closed or absent receiver just drops the
/// event.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<Event>>,
}

impl EventSink {
    pub fn new(tx: Option<Sender<Event>>) -> Self {
        Self { tx }
    }

    /// A sink that drops everything.
    pub fn none() -> Self {
        Self::default()
    }

    pub async fn emit(&self, event: Event) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event).await;
        }
    }
}

impl From<Sender<Event>> for EventSink {
    fn from(tx: Sender<Event>) -> Self {
        Self::new(Some(tx))
    }
}

/// Create a new RunRecord with Pending status.
pub fn create_run(crew_name: String, inputs: Inputs) -> RunRecord {
    RunRecord {
        run_id: Uuid::new_v4(),
        crew_name,
        status: RunStatus::Pending,
        inputs,
        tasks_output: Vec::new(),
        started_at: Utc::now(),
        completed_at: None,
    }
}

/// Emit `CrewStarted` and transition to Running.
pub async fn start_run(run: &mut RunRecord, events: &EventSink, task_index: usize) {
    events
        .emit(Event::CrewStarted {
            run_id: run.run_id,
            crew_name: run.crew_name.clone(),
        })
        .await;
    set_status(run, events, RunStatus::Running, task_index).await;
}

/// Append a finished task's output and emit `TaskCompleted`.
pub async fn record_task_output(run: &mut RunRecord, events: &EventSink, output: TaskOutput) {
    let event = Event::TaskCompleted {
        run_id: run.run_id,
        task_id: output.task_id,
        task_name: output.task_name.clone(),
    };
    run.tasks_output.push(output);
    events.emit(event).await;
}

/// Emit a log line for the run.
pub async fn log_to_run(run: &RunRecord, events: &EventSink, message: String) {
    events
        .emit(Event::AgentLogChunk {
            run_id: run.run_id,
            content: message,
        })
        .await;
}

/// Mark the run as completed and emit `CrewCompleted`.
pub async fn complete_run(run: &mut RunRecord, events: &EventSink) {
    run.completed_at = Some(Utc::now());
    let task_index = run.tasks_output.len();
    set_status(run, events, RunStatus::Completed, task_index).await;
    events.emit(Event::CrewCompleted { run_id: run.run_id }).await;
}

/// Mark the run as failed and emit `CrewFailed`.
pub async fn fail_run(run: &mut RunRecord, events: &EventSink, task_index: usize, error: String) {
    run.completed_at = Some(Utc::now());
    set_status(run, events, RunStatus::Failed, task_index).await;
    events
        .emit(Event::CrewFailed {
            run_id: run.run_id,
            error,
        })
        .await;
}

async fn set_status(run: &mut RunRecord, events: &EventSink, status: RunStatus, task_index: usize) {
    run.status = status;
    events
        .emit(Event::RunStatusUpdate {
            run_id: run.run_id,
            status,
            task_index,
        })
        .await;
}
