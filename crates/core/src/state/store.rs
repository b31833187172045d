//! Persistence of the latest run, for `replay` and `tasks`.

use anyhow::{Context, Result};
use ck_protocol::process_models::RunRecord;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory (inside the results directory) holding run state.
pub const STATE_DIR: &str = ".crew";

/// File name of the latest run record.
pub const LATEST_RUN_FILE: &str = "latest_run.json";

/// Reads and writes `<results>/.crew/latest_run.json`.
#[derive(Debug, Clone)]
pub struct RunStore {
    path: PathBuf,
}

impl RunStore {
    pub fn new(results_dir: &Path) -> Self {
        Self {
            path: results_dir.join(STATE_DIR).join(LATEST_RUN_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrite the stored record.
    pub fn save(&self, run: &RunRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(run)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = %self.path.display(), tasks = run.tasks_output.len(), "Saved run record");
        Ok(())
    }

    /// The stored record, or `None` if no run has been saved yet.
    pub fn load_latest(&self) -> Result<Option<RunRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };
        let run = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt run record at {}", self.path.display()))?;
        Ok(Some(run))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::run::create_run;
    use ck_protocol::crew_models::{Inputs, TaskOutput};
    use tempfile::tempdir;
    use uuid::Uuid;

    #[test]
    fn test_missing_record_is_none() {
        let dir = tempdir().expect("tempdir");
        let store = RunStore::new(dir.path());
        assert!(store.load_latest().expect("load").is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().expect("tempdir");
        let store = RunStore::new(&dir.path().join("results"));

        let mut run = create_run("crew".to_string(), Inputs::new().with("topic", "X"));
        run.tasks_output.push(TaskOutput {
            task_id: Uuid::new_v4(),
            task_name: "research_task".to_string(),
            agent_role: "Researcher".to_string(),
            description: "D X".to_string(),
            raw: "findings".to_string(),
            output_file: dir.path().join("results/research_report.md"),
        });
        store.save(&run).expect("save");

        assert!(store.path().ends_with(".crew/latest_run.json"));
        let loaded = store.load_latest().expect("load").expect("present");
        assert_eq!(loaded.run_id, run.run_id);
        assert_eq!(loaded.tasks_output, run.tasks_output);
        assert_eq!(loaded.inputs, run.inputs);
    }

    #[test]
    fn test_corrupt_record_is_error() {
        let dir = tempdir().expect("tempdir");
        let store = RunStore::new(dir.path());
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();

        let err = store.load_latest().unwrap_err();
        assert!(err.to_string().contains("Corrupt run record"));
    }
}
