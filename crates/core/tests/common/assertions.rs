//! Event assertions for integration tests.

use ck_protocol::events::Event;
use tokio::sync::mpsc::Receiver;

/// Drain everything currently buffered in `rx`.
pub fn drain(rx: &mut Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn has_crew_started(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::CrewStarted { .. }))
}

pub fn has_crew_completed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::CrewCompleted { .. }))
}

#[allow(dead_code)]
pub fn has_crew_failed(events: &[Event]) -> bool {
    events.iter().any(|e| matches!(e, Event::CrewFailed { .. }))
}

/// Task names from `TaskStarted` events, in order.
pub fn started_tasks(events: &[Event]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::TaskStarted { task_name, .. } => Some(task_name.clone()),
            _ => None,
        })
        .collect()
}

/// `(task, coworker)` pairs from `TaskDelegated` events, in order.
#[allow(dead_code)]
pub fn delegations(events: &[Event]) -> Vec<(String, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::TaskDelegated {
                task_name,
                coworker,
                ..
            } => Some((task_name.clone(), coworker.clone())),
            _ => None,
        })
        .collect()
}
