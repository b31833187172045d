//! Subcommand implementations.

use crate::feedback::StdinFeedback;
use crate::printer;
use anyhow::{Context, Result};
use chrono::Datelike;
use ck_core::config::loader::load_config;
use ck_core::config::Settings;
use ck_core::crew::{Crew, CrewAssembler};
use ck_core::init::{generate_crew_project, InitOptions};
use ck_core::llm::ModelFactory;
use ck_core::tools::{SerperSearchTool, Tool};
use ck_protocol::crew_models::Inputs;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const DEFAULT_TOPIC: &str = "Build a cross-platform desktop application that trains powerful ML \
and RL models to predict forex currency pair movements (e.g. EUR/USD, GBP/JPY), visualizes \
training and backtesting metrics, supports backtesting on historical data, provides explanatory \
tooltips suitable for both beginners and experts, and enables model export for real-world \
deployment.";

const DEFAULT_REQUIREMENTS: [&str; 6] = [
    "Train both supervised ML (e.g. LSTM, random forest) and reinforcement learning (e.g. DQN, PPO) models using at least 10 years of historical forex data.",
    "Visualize training metrics (loss, accuracy, reward) in interactive charts (using Plotly/Matplotlib).",
    "Implement backtesting on multiple forex pairs with downloadable summary reports and equity curves.",
    "Offer user-friendly tooltips that explain model parameters, metrics, and actions in both beginner and expert modes.",
    "Ensure GUI is intuitive and cross-platform (Electron, Tauri, or similar).",
    "Modular backend/frontend separation; code quality enforced via formatting and security audits.",
];

/// Topic used by `train` and `test`.
const EVALUATION_TOPIC: &str = "AI LLMs";

fn current_year() -> String {
    chrono::Local::now().year().to_string()
}

fn run_inputs(topic: Option<String>) -> Inputs {
    let requirements: Vec<String> = DEFAULT_REQUIREMENTS.iter().map(|r| r.to_string()).collect();
    Inputs::new()
        .with("topic", topic.unwrap_or_else(|| DEFAULT_TOPIC.to_string()))
        .with("requirements", requirements)
        .with("current_year", current_year())
}

fn evaluation_inputs() -> Inputs {
    Inputs::new()
        .with("topic", EVALUATION_TOPIC)
        .with("current_year", current_year())
}

/// Read settings and configuration from the current directory and build the crew.
async fn assemble() -> Result<(Crew, ModelFactory)> {
    let root = Path::new(".");
    let settings = Settings::from_env();
    let config = load_config(root)
        .await
        .context("Failed to load crew configuration")?;
    let models = ModelFactory::new(&settings, &config.global)?;
    let search: Arc<dyn Tool> = Arc::new(SerperSearchTool::new(settings.serper_api_key.clone()));

    let crew = CrewAssembler::new(&config, &models, search).assemble()?;
    Ok((crew, models))
}

pub async fn run(topic: Option<String>, verbose: bool) -> Result<()> {
    println!("{}", "🚀 Starting crew...".bold());
    let (crew, _models) = assemble().await?;
    let (events, printer) = printer::spawn(verbose);

    let result = crew.kickoff(run_inputs(topic), events).await;
    printer.finish().await;
    let output = result?;

    println!("{}", "✅ Crew execution completed!".green().bold());
    println!("📊 Result: {}", crew.output_file().display());
    println!();
    println!("{}", output.raw);
    Ok(())
}

pub async fn train(n_iterations: u32, filename: PathBuf, verbose: bool) -> Result<()> {
    let (crew, _models) = assemble().await?;
    let (events, printer) = printer::spawn(verbose);

    let result = crew
        .train(n_iterations, &filename, evaluation_inputs(), &StdinFeedback::new(), events)
        .await;
    printer.finish().await;
    let records = result?;

    println!(
        "{} Saved {} feedback entries to {}",
        "✅".green(),
        records.len(),
        filename.display()
    );
    Ok(())
}

pub async fn replay(task_id: String, verbose: bool) -> Result<()> {
    let (crew, _models) = assemble().await?;
    let (events, printer) = printer::spawn(verbose);

    let result = crew.replay(&task_id, events).await;
    printer.finish().await;
    let output = result?;

    println!("{}", "✅ Replay completed!".green().bold());
    println!("{}", output.raw);
    Ok(())
}

pub async fn test(n_iterations: u32, eval_llm: String, verbose: bool) -> Result<()> {
    let (crew, models) = assemble().await?;
    let judge = models.ad_hoc(&eval_llm);
    let (events, printer) = printer::spawn(verbose);

    let result = crew
        .test(n_iterations, judge, evaluation_inputs(), events)
        .await;
    printer.finish().await;
    let report = result?;

    println!();
    println!("{report}");
    Ok(())
}

pub async fn init(dir: PathBuf, force: bool) -> Result<()> {
    let written = generate_crew_project(InitOptions {
        target_dir: dir.clone(),
        force,
    })
    .await?;

    for path in &written {
        println!("  {} {}", "created".green(), path.display());
    }
    println!(
        "{} Crew project ready in {}. Edit config/*.yaml, then run `crew run`.",
        "✅".green(),
        dir.display()
    );
    Ok(())
}

pub async fn tasks() -> Result<()> {
    let (crew, _models) = assemble().await?;
    let Some(record) = crew.latest_run()? else {
        println!("No previous run found. Run `crew run` first.");
        return Ok(());
    };

    println!(
        "Latest run {} ({:?}, started {})",
        record.run_id.to_string().dimmed(),
        record.status,
        record.started_at.format("%Y-%m-%d %H:%M:%S")
    );
    for output in &record.tasks_output {
        println!(
            "  {}  {:<14} {}",
            output.task_id.to_string().cyan(),
            output.task_name,
            output.agent_role.dimmed()
        );
    }
    Ok(())
}
