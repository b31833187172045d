//! Builds a [`Crew`] from loaded configuration.
//!
//! For every entry of [`ROLES`] the assembler picks the agent spec from
//! `config/agents.yaml` (or the role's default), binds the role's model and
//! tools, then does the same for the paired task. Any failure is logged with
//! the failing name and returned; nothing partial escapes.

use crate::agents::registry::{RoleEntry, ToolSelector, AGGREGATE_OUTPUT_FILE, ROLES};
use crate::agents::AgentInstance;
use crate::config::CrewConfig;
use crate::crew::error::{AssemblyError, AssemblyResult};
use crate::crew::task::TaskInstance;
use crate::crew::Crew;
use crate::llm::{ModelKind, ModelProvider};
use crate::tools::{Tool, ToolSet};
use ck_protocol::agent_models::AgentSpec;
use ck_protocol::task_models::TaskSpec;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Assembles the four-role crew.
pub struct CrewAssembler<'a> {
    config: &'a CrewConfig,
    models: &'a dyn ModelProvider,
    web_search: Arc<dyn Tool>,
}

impl<'a> CrewAssembler<'a> {
    /// `web_search` is given to the researcher and shared at crew level.
    pub fn new(
        config: &'a CrewConfig,
        models: &'a dyn ModelProvider,
        web_search: Arc<dyn Tool>,
    ) -> Self {
        Self {
            config,
            models,
            web_search,
        }
    }

    pub fn assemble(&self) -> AssemblyResult<Crew> {
        let results_dir = self.config.results_dir();
        std::fs::create_dir_all(&results_dir).map_err(|source| {
            error!(path = %results_dir.display(), "Failed to create results directory: {source}");
            AssemblyError::ResultsDir {
                path: results_dir.clone(),
                source,
            }
        })?;

        self.warn_unused_entries();

        let mut agents = Vec::with_capacity(ROLES.len());
        for entry in ROLES.iter() {
            let agent = self.build_agent(entry).inspect_err(|e| {
                error!(agent = entry.agent_key, "Failed to initialize '{}' agent: {e}", entry.agent_key)
            })?;
            agents.push(Arc::new(agent));
        }

        let mut used_outputs: HashSet<PathBuf> = HashSet::new();
        let aggregate = results_dir.join(AGGREGATE_OUTPUT_FILE);
        used_outputs.insert(aggregate.clone());

        let mut tasks = Vec::with_capacity(ROLES.len());
        for entry in ROLES.iter() {
            let task = self
                .build_task(entry, &agents, &results_dir, &mut used_outputs)
                .inspect_err(|e| {
                    error!(task = entry.task_key, "Failed to configure '{}': {e}", entry.task_key)
                })?;
            tasks.push(task);
        }

        info!(
            agents = agents.len(),
            tasks = tasks.len(),
            process = ?self.config.global.process,
            "Assembling crew"
        );

        let crew_name = self
            .config
            .root
            .canonicalize()
            .ok()
            .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "crew".to_string());

        Ok(Crew::new(crew_name, agents, tasks)
            .with_process(self.config.global.process)
            .with_manager_llm(self.models.model(ModelKind::General))
            .with_tools(ToolSet::new().with(self.web_search.clone()))
            .with_output_file(aggregate)
            .with_results_dir(results_dir)
            .with_verbose(self.config.global.verbose))
    }

    fn build_agent(&self, entry: &RoleEntry) -> AssemblyResult<AgentInstance> {
        info!("Instantiating {} agent", entry.agent_key);
        let mut spec = self
            .config
            .agents
            .get(entry.agent_key)
            .cloned()
            .unwrap_or_else(|| {
                debug!(agent = entry.agent_key, "No agent entry, using default");
                (entry.default_agent)()
            });
        spec.name = entry.agent_key.to_string();
        validate_agent(&spec)?;

        let tools = match entry.tools {
            ToolSelector::None => ToolSet::new(),
            ToolSelector::WebSearch => ToolSet::new().with(self.web_search.clone()),
        };

        Ok(AgentInstance::new(spec, self.models.model(entry.model))
            .with_tools(tools)
            .with_verbose(self.config.global.verbose)
            .with_max_iter(self.config.global.max_iter))
    }

    fn build_task(
        &self,
        entry: &RoleEntry,
        agents: &[Arc<AgentInstance>],
        results_dir: &std::path::Path,
        used_outputs: &mut HashSet<PathBuf>,
    ) -> AssemblyResult<TaskInstance> {
        info!("Configuring {}", entry.task_key);
        let mut spec = self
            .config
            .tasks
            .get(entry.task_key)
            .cloned()
            .unwrap_or_else(|| {
                debug!(task = entry.task_key, "No task entry, using default");
                (entry.default_task)()
            });
        spec.name = entry.task_key.to_string();
        validate_task(&spec)?;

        let agent_key = spec.agent.as_deref().unwrap_or(entry.agent_key);
        let agent = agents
            .iter()
            .find(|a| a.spec().name == agent_key)
            .cloned()
            .ok_or_else(|| AssemblyError::UnknownAgent {
                task: spec.name.clone(),
                agent: agent_key.to_string(),
            })?;

        let output_file = results_dir.join(entry.output_file);
        if !used_outputs.insert(output_file.clone()) {
            return Err(AssemblyError::DuplicateOutputFile { path: output_file });
        }

        Ok(TaskInstance::new(spec, agent, output_file))
    }

    fn warn_unused_entries(&self) {
        for name in self.config.agents.keys() {
            if !ROLES.iter().any(|r| r.agent_key == name.as_str()) {
                warn!(agent = %name, "Ignoring agent entry with no matching role");
            }
        }
        for name in self.config.tasks.keys() {
            if !ROLES.iter().any(|r| r.task_key == name.as_str()) {
                warn!(task = %name, "Ignoring task entry with no matching role");
            }
        }
    }
}

fn validate_agent(spec: &AgentSpec) -> AssemblyResult<()> {
    for (field, value) in [
        ("role", &spec.role),
        ("goal", &spec.goal),
        ("backstory", &spec.backstory),
    ] {
        require(value, "agent", &spec.name, field)?;
    }
    Ok(())
}

fn validate_task(spec: &TaskSpec) -> AssemblyResult<()> {
    require(&spec.description, "task", &spec.name, "description")?;
    require(&spec.expected_output, "task", &spec.name, "expected_output")
}

fn require(value: &str, kind: &'static str, name: &str, field: &'static str) -> AssemblyResult<()> {
    if value.trim().is_empty() {
        return Err(AssemblyError::InvalidSpec {
            kind,
            name: name.to_string(),
            field,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_rejects_blank() {
        assert!(require("text", "agent", "researcher", "role").is_ok());
        match require("  \n", "task", "coding_task", "description") {
            Err(AssemblyError::InvalidSpec { kind, name, field }) => {
                assert_eq!((kind, name.as_str(), field), ("task", "coding_task", "description"));
            }
            other => panic!("Expected InvalidSpec, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_agent_checks_every_field() {
        let spec = AgentSpec::new("analyst", "Analyst", "Goal", "");
        let err = validate_agent(&spec).unwrap_err();
        assert!(err.to_string().contains("backstory"));
    }
}
