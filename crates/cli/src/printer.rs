//! Renders engine events on the terminal.

use ck_core::state::EventSink;
use ck_protocol::events::Event;
use colored::Colorize;
use std::io::Write;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

const CHANNEL_CAPACITY: usize = 256;

/// Background task printing events until every sender is dropped.
pub struct Printer {
    handle: JoinHandle<()>,
}

impl Printer {
    /// Wait until the remaining events are printed.
    pub async fn finish(self) {
        if let Err(e) = self.handle.await {
            warn!("Event printer stopped: {e}");
        }
    }
}

/// Start printing. Agent text is only streamed when `verbose`.
pub fn spawn(verbose: bool) -> (EventSink, Printer) {
    let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);
    let handle = tokio::spawn(async move {
        let mut streaming = false;
        while let Some(event) = rx.recv().await {
            // Close a streamed block before printing a status line.
            let is_chunk = matches!(event, Event::AgentLogChunk { .. });
            if streaming && !is_chunk {
                println!();
                streaming = false;
            }
            if is_chunk && verbose {
                streaming = true;
            }
            print_event(&event, verbose);
        }
        if streaming {
            println!();
        }
    });
    (EventSink::from(tx), Printer { handle })
}

fn print_event(event: &Event, verbose: bool) {
    match event {
        Event::CrewStarted { run_id, crew_name } => {
            println!(
                "{} {} {}",
                "Crew".bold(),
                crew_name.bold(),
                format!("(run {run_id})").dimmed()
            );
        }
        Event::RunStatusUpdate {
            status, task_index, ..
        } => {
            if verbose {
                println!("{}", format!("status {status:?} at task {task_index}").dimmed());
            }
        }
        Event::TaskDelegated {
            task_name,
            coworker,
            ..
        } => {
            println!("  {} {task_name} → {coworker}", "delegated".cyan());
        }
        Event::TaskStarted {
            task_name,
            agent_role,
            ..
        } => {
            println!("{} {} {}", "▶".blue(), task_name.bold(), agent_role.dimmed());
        }
        Event::AgentLogChunk { content, .. } => {
            if verbose {
                print!("{}", content.dimmed());
                let _ = std::io::stdout().flush();
            }
        }
        Event::ToolCalled {
            agent_role, tool, ..
        } => {
            println!("  {} {agent_role} used {tool}", "tool".yellow());
        }
        Event::TaskCompleted {
            task_id, task_name, ..
        } => {
            println!(
                "{} {} {}",
                "✔".green(),
                task_name,
                format!("({task_id})").dimmed()
            );
        }
        Event::CrewCompleted { .. } => {}
        Event::CrewFailed { error, .. } => {
            println!("{} {}", "✖".red(), error.red());
        }
    }
}
