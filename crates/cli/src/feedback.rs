//! Feedback from the terminal for `crew train`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ck_core::engine::training::FeedbackProvider;
use ck_protocol::crew_models::TaskOutput;
use colored::Colorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

/// Shows each task output and reads feedback lines until an empty line.
pub struct StdinFeedback {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinFeedback {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

#[async_trait]
impl FeedbackProvider for StdinFeedback {
    async fn feedback(&self, output: &TaskOutput) -> Result<String> {
        println!();
        println!(
            "{}",
            format!("── {} ({}) ──", output.task_name, output.agent_role).bold()
        );
        println!("{}", output.raw);
        print!(
            "{} ",
            "Provide feedback on the output above (empty line to finish):".cyan()
        );
        std::io::stdout().flush()?;

        let mut lines = self.lines.lock().await;
        let mut feedback = Vec::new();
        while let Some(line) = lines.next_line().await.context("Failed to read feedback")? {
            if line.trim().is_empty() {
                break;
            }
            feedback.push(line);
        }
        Ok(feedback.join("\n"))
    }
}
