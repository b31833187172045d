use crate::agents::AgentInstance;
use ck_protocol::task_models::TaskSpec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// A task bound to the agent that owns it and to its output file.
///
/// The `TaskSpec` keeps its `{placeholder}` templates; they are filled in when the
/// task runs.
#[derive(Debug, Clone)]
pub struct TaskInstance {
    id: Uuid,
    spec: TaskSpec,
    agent: Arc<AgentInstance>,
    output_file: PathBuf,
}

impl TaskInstance {
    pub fn new(spec: TaskSpec, agent: Arc<AgentInstance>, output_file: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
            agent,
            output_file,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn spec(&self) -> &TaskSpec {
        &self.spec
    }

    pub fn agent(&self) -> &Arc<AgentInstance> {
        &self.agent
    }

    /// Key of the bound agent.
    pub fn agent_key(&self) -> &str {
        &self.agent.spec().name
    }

    pub fn output_file(&self) -> &Path {
        &self.output_file
    }
}
