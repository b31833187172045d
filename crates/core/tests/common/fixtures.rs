//! Project fixtures for integration tests.

use ck_core::config::loader::load_config;
use ck_core::config::CrewConfig;
use ck_protocol::crew_models::Inputs;
use std::path::Path;
use tempfile::TempDir;

/// Agents document with every role.
#[allow(dead_code)]
pub const FULL_AGENTS: &str = r#"
researcher:
  role: R
  goal: "G {topic}"
  backstory: B
analyst:
  role: Analyst
  goal: Design a solution for {topic}
  backstory: Careful analyst.
coding_agent:
  role: Developer
  goal: Write the code for {topic}
  backstory: Seasoned developer.
overlord:
  role: Project Manager
  goal: Validate the work on {topic}
  backstory: Experienced coordinator.
"#;

/// Tasks document with every role.
#[allow(dead_code)]
pub const FULL_TASKS: &str = r#"
research_task:
  description: "D {topic}"
  expected_output: E
  agent: researcher
analyst_task:
  description: Analyze the research on {topic}
  expected_output: A specification
  agent: analyst
coding_task:
  description: Implement {topic}
  expected_output: Source code
  agent: coding_agent
overlord_task:
  description: Review everything about {topic}
  expected_output: A final report
  agent: overlord
"#;

/// Sequential settings, so tests need no manager replies.
#[allow(dead_code)]
pub const SEQUENTIAL_TOML: &str = "process = \"sequential\"\nmax_iter = 3\n";

/// Write the given documents into `root`. `None` leaves the file out.
pub fn write_project(
    root: &Path,
    agents: Option<&str>,
    tasks: Option<&str>,
    crew_toml: Option<&str>,
) -> std::io::Result<()> {
    std::fs::create_dir_all(root.join("config"))?;
    if let Some(agents) = agents {
        std::fs::write(root.join("config/agents.yaml"), agents)?;
    }
    if let Some(tasks) = tasks {
        std::fs::write(root.join("config/tasks.yaml"), tasks)?;
    }
    if let Some(crew_toml) = crew_toml {
        std::fs::write(root.join("crew.toml"), crew_toml)?;
    }
    Ok(())
}

/// Create a temporary project and load its configuration.
///
/// The returned TempDir must be kept alive for the test duration.
#[allow(dead_code)]
pub async fn create_test_project(
    agents: Option<&str>,
    tasks: Option<&str>,
    crew_toml: Option<&str>,
) -> (TempDir, CrewConfig) {
    let dir = tempfile::tempdir().expect("tempdir");
    write_project(dir.path(), agents, tasks, crew_toml).expect("write project");
    let config = load_config(dir.path()).await.expect("load config");
    (dir, config)
}

#[allow(dead_code)]
pub fn topic_inputs(topic: &str) -> Inputs {
    Inputs::new()
        .with("topic", topic)
        .with("current_year", "2026")
}
