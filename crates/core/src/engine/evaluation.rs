//! Output scoring for `crew test`.

use crate::llm::{complete, ChatMessage, LanguageModel};
use anyhow::{Context, Result};
use ck_protocol::crew_models::TaskOutput;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Scores task outputs with an evaluation model.
pub struct Evaluator {
    judge: Arc<dyn LanguageModel>,
}

impl Evaluator {
    pub fn new(judge: Arc<dyn LanguageModel>) -> Self {
        Self { judge }
    }

    pub fn model_id(&self) -> &str {
        self.judge.model_id()
    }

    /// Score one output from 1 to 10. `None` if the reply holds no number.
    pub async fn score(&self, output: &TaskOutput, expected_output: &str) -> Result<Option<u8>> {
        let messages = vec![
            ChatMessage::system(
                "You are an impartial evaluator. You grade how well a task output \
                 fulfils its task on a scale from 1 (useless) to 10 (excellent).",
            ),
            ChatMessage::user(format!(
                "Task: {}\n\nExpected output: {}\n\nActual output:\n{}\n\n\
                 Reply with a single integer score between 1 and 10.",
                output.description, expected_output, output.raw
            )),
        ];

        let reply = complete(self.judge.as_ref(), messages)
            .await
            .with_context(|| format!("Failed to evaluate '{}'", output.task_name))?;

        let score = parse_score(&reply);
        match score {
            Some(score) => debug!(task = %output.task_name, score, "Output scored"),
            None => warn!(task = %output.task_name, reply = %reply.trim(), "Unparsable score"),
        }
        Ok(score)
    }
}

/// Score found in a judge reply.
///
/// In order of preference: an `N/10` or `N out of 10` rating, the last
/// integer within 1..=10, the first integer clamped to 1..=10.
pub fn parse_score(reply: &str) -> Option<u8> {
    let numbers = integers(reply);

    let rated = numbers.iter().find(|(_, end, _)| {
        let rest = reply[*end..].trim_start();
        let rest = rest
            .strip_prefix('/')
            .or_else(|| rest.strip_prefix("out of"))
            .map(str::trim_start);
        rest.is_some_and(|r| r.starts_with("10") && !r[2..].starts_with(|c: char| c.is_ascii_digit()))
    });
    if let Some((_, _, value)) = rated {
        return Some(clamp_score(*value));
    }

    if let Some((_, _, value)) = numbers.iter().rev().find(|(_, _, v)| (1..=10).contains(v)) {
        return Some(*value as u8);
    }

    numbers.first().map(|(_, _, value)| clamp_score(*value))
}

/// `(start, end, value)` of every run of ASCII digits; overflow saturates.
fn integers(text: &str) -> Vec<(usize, usize, u64)> {
    let mut found = Vec::new();
    let mut start = None;
    for (i, c) in text.char_indices().chain([(text.len(), ' ')]) {
        match (c.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                let value = text[s..i].parse::<u64>().unwrap_or(u64::MAX);
                found.push((s, i, value));
                start = None;
            }
            _ => {}
        }
    }
    found
}

fn clamp_score(value: u64) -> u8 {
    value.clamp(1, 10) as u8
}

/// Scores of one task across iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskScores {
    pub task_name: String,
    /// One entry per iteration; `None` where the score could not be parsed.
    pub scores: Vec<Option<u8>>,
}

impl TaskScores {
    pub fn average(&self) -> Option<f64> {
        average(self.scores.iter().flatten().copied())
    }
}

/// Result of `crew test`.
#[derive(Debug, Clone, PartialEq)]
pub struct TestReport {
    pub eval_model: String,
    pub iterations: u32,
    pub tasks: Vec<TaskScores>,
}

impl TestReport {
    pub fn new(eval_model: impl Into<String>, iterations: u32) -> Self {
        Self {
            eval_model: eval_model.into(),
            iterations,
            tasks: Vec::new(),
        }
    }

    /// Store the score of `task_name` for 1-based `iteration`.
    ///
    /// Scores grow only up to the recorded iteration; unrecorded
    /// iterations read as `None`.
    pub fn record(&mut self, iteration: u32, task_name: &str, score: Option<u8>) {
        let Some(slot) = (iteration as usize).checked_sub(1) else {
            return;
        };
        let index = match self.tasks.iter().position(|t| t.task_name == task_name) {
            Some(index) => index,
            None => {
                self.tasks.push(TaskScores {
                    task_name: task_name.to_string(),
                    scores: Vec::new(),
                });
                self.tasks.len() - 1
            }
        };

        let scores = &mut self.tasks[index].scores;
        if scores.len() <= slot {
            scores.resize(slot + 1, None);
        }
        scores[slot] = score;
    }

    /// Average over every parsed score of every task.
    pub fn crew_average(&self) -> Option<f64> {
        average(
            self.tasks
                .iter()
                .flat_map(|t| t.scores.iter().flatten().copied()),
        )
    }
}

fn average(scores: impl Iterator<Item = u8>) -> Option<f64> {
    let (sum, count) = scores.fold((0u32, 0u32), |(sum, count), s| (sum + s as u32, count + 1));
    (count > 0).then(|| sum as f64 / count as f64)
}

impl fmt::Display for TestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name_width = self
            .tasks
            .iter()
            .map(|t| t.task_name.len())
            .chain(["Tasks/Crew".len()])
            .max()
            .unwrap_or(10);
        let cell = |score: Option<u8>| score.map_or("-".to_string(), |s| s.to_string());
        let avg = |value: Option<f64>| value.map_or("-".to_string(), |v| format!("{v:.1}"));

        writeln!(f, "Tasks Scores (1-10, evaluated by {})", self.eval_model)?;
        write!(f, "{:<name_width$}", "Tasks/Crew")?;
        for iteration in 1..=self.iterations {
            write!(f, " | {:>6}", format!("Run {iteration}"))?;
        }
        writeln!(f, " | {:>7}", "Avg.")?;

        for task in &self.tasks {
            write!(f, "{:<name_width$}", task.task_name)?;
            for iteration in 0..self.iterations as usize {
                let score = task.scores.get(iteration).copied().flatten();
                write!(f, " | {:>6}", cell(score))?;
            }
            writeln!(f, " | {:>7}", avg(task.average()))?;
        }

        write!(f, "{:<name_width$}", "Crew")?;
        for iteration in 0..self.iterations as usize {
            let run = average(
                self.tasks
                    .iter()
                    .filter_map(|t| t.scores.get(iteration).copied().flatten()),
            );
            write!(f, " | {:>6}", avg(run))?;
        }
        write!(f, " | {:>7}", avg(self.crew_average()))
    }
}
