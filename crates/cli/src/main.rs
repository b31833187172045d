use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod feedback;
mod printer;

#[derive(Parser)]
#[command(
    name = "crew",
    about = "Research, design, build and review a project with a local model crew"
)]
#[command(version, propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Run as if started in this directory
    #[arg(short = 'C', long = "dir", global = true)]
    dir: Option<PathBuf>,

    /// Verbose output (debug logs and streamed agent text)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the crew once
    Run {
        /// Project topic; defaults to the forex trainer brief
        #[arg(long)]
        topic: Option<String>,
    },
    /// Run the crew repeatedly, collecting feedback on every task
    Train {
        n_iterations: u32,
        /// Where the feedback is saved (JSON)
        filename: PathBuf,
    },
    /// Rerun the latest run from one of its tasks
    Replay {
        /// Task id (see `crew tasks`) or task name
        task_id: String,
    },
    /// Run the crew repeatedly and score every task with another model
    Test {
        n_iterations: u32,
        /// Model id of the evaluation model
        eval_llm: String,
    },
    /// Write a crew project (crew.toml and config/*.yaml)
    Init {
        /// Target directory
        #[arg(default_value = ".")]
        dir: PathBuf,
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
    /// List the tasks of the latest run
    Tasks,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Some(dir) = &cli.dir {
        std::env::set_current_dir(dir)?;
    }

    match cli.command {
        Commands::Run { topic } => commands::run(topic, cli.verbose).await.map_err(|e| {
            eprintln!("{} {e:#}", "❌".red());
            color_eyre::eyre::eyre!("{e:#}")
        }),
        Commands::Train {
            n_iterations,
            filename,
        } => exit_on_error(
            "training",
            commands::train(n_iterations, filename, cli.verbose).await,
        ),
        Commands::Replay { task_id } => {
            exit_on_error("replaying", commands::replay(task_id, cli.verbose).await)
        }
        Commands::Test {
            n_iterations,
            eval_llm,
        } => exit_on_error(
            "testing",
            commands::test(n_iterations, eval_llm, cli.verbose).await,
        ),
        Commands::Init { dir, force } => exit_on_error("initializing", commands::init(dir, force).await),
        Commands::Tasks => exit_on_error("listing the tasks of", commands::tasks().await),
    }
}

/// Print a failure the way every non-`run` command reports it and exit 1.
fn exit_on_error(verb: &str, result: anyhow::Result<()>) -> color_eyre::Result<()> {
    if let Err(e) = result {
        eprintln!(
            "{} {}",
            "❌".red(),
            format!("An error occurred while {verb} the crew: {e:#}").red()
        );
        std::process::exit(1);
    }
    Ok(())
}
