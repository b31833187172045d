//! The fixed roster of roles that make up a crew.
//!
//! Order matters: it is the order tasks run in.

use crate::llm::ModelKind;
use ck_protocol::agent_models::AgentSpec;
use ck_protocol::task_models::TaskSpec;

/// File the final crew output is written to, inside the results directory.
pub const AGGREGATE_OUTPUT_FILE: &str = "crew_report.md";

/// Tools an agent is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolSelector {
    None,
    WebSearch,
}

/// One agent/task pair of the crew.
#[derive(Debug, Clone, Copy)]
pub struct RoleEntry {
    pub agent_key: &'static str,
    pub default_agent: fn() -> AgentSpec,
    pub model: ModelKind,
    pub tools: ToolSelector,
    pub task_key: &'static str,
    pub default_task: fn() -> TaskSpec,
    /// File name of the task's output, inside the results directory.
    pub output_file: &'static str,
}

pub static ROLES: [RoleEntry; 4] = [
    RoleEntry {
        agent_key: "researcher",
        default_agent: default_researcher,
        model: ModelKind::Reasoning,
        tools: ToolSelector::WebSearch,
        task_key: "research_task",
        default_task: default_research_task,
        output_file: "research_report.md",
    },
    RoleEntry {
        agent_key: "analyst",
        default_agent: default_analyst,
        model: ModelKind::Reasoning,
        tools: ToolSelector::None,
        task_key: "analyst_task",
        default_task: default_analyst_task,
        output_file: "analyst_report.md",
    },
    RoleEntry {
        agent_key: "coding_agent",
        default_agent: default_coding_agent,
        model: ModelKind::Code,
        tools: ToolSelector::None,
        task_key: "coding_task",
        default_task: default_coding_task,
        output_file: "coding_report.md",
    },
    RoleEntry {
        agent_key: "overlord",
        default_agent: default_overlord,
        model: ModelKind::General,
        tools: ToolSelector::None,
        task_key: "overlord_task",
        default_task: default_overlord_task,
        output_file: "overlord_report.md",
    },
];

/// Look up a role by its agent key.
pub fn role_for_agent(agent_key: &str) -> Option<&'static RoleEntry> {
    ROLES.iter().find(|entry| entry.agent_key == agent_key)
}

fn default_researcher() -> AgentSpec {
    AgentSpec::new(
        "researcher",
        "Researcher",
        "Gather comprehensive research on {topic}",
        "Expert researcher with web search capabilities",
    )
}

fn default_analyst() -> AgentSpec {
    AgentSpec::new(
        "analyst",
        "Analyst",
        "Analyze research and provide insights",
        "Detail-oriented analyst",
    )
}

fn default_coding_agent() -> AgentSpec {
    AgentSpec::new(
        "coding_agent",
        "Developer",
        "Implement solutions based on requirements",
        "Full-stack developer",
    )
}

fn default_overlord() -> AgentSpec {
    AgentSpec::new(
        "overlord",
        "Project Manager",
        "Coordinate and validate all outputs",
        "Experienced project coordinator",
    )
}

fn default_research_task() -> TaskSpec {
    TaskSpec::new(
        "research_task",
        "Research the given topic thoroughly",
        "Comprehensive research report",
        "researcher",
    )
}

fn default_analyst_task() -> TaskSpec {
    TaskSpec::new(
        "analyst_task",
        "Analyze research findings",
        "Analysis report with insights",
        "analyst",
    )
}

fn default_coding_task() -> TaskSpec {
    TaskSpec::new(
        "coding_task",
        "Implement the solution",
        "Working codebase",
        "coding_agent",
    )
}

fn default_overlord_task() -> TaskSpec {
    TaskSpec::new(
        "overlord_task",
        "Coordinate and validate all outputs",
        "Final project report",
        "overlord",
    )
}
