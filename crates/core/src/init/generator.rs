//! File generation for `crew init`.

use super::error::{InitError, InitResult};
use super::templates::get_template;
use crate::config::models::{AGENTS_FILE, GLOBAL_FILE, TASKS_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Template path and destination path (relative to the project root) of
/// every generated file.
pub const PROJECT_FILES: [(&str, &str); 4] = [
    ("crew.toml", GLOBAL_FILE),
    ("config/agents.yaml", AGENTS_FILE),
    ("config/tasks.yaml", TASKS_FILE),
    ("env.example", ".env.example"),
];

/// Options for `crew init`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Project root that receives the files.
    pub target_dir: PathBuf,

    /// Overwrite files that already exist.
    pub force: bool,
}

impl Default for InitOptions {
    fn default() -> Self {
        Self {
            target_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            force: false,
        }
    }
}

/// Write a crew project into `options.target_dir`:
///
/// ```text
/// <target_dir>/
/// ├── crew.toml
/// ├── .env.example
/// └── config/
///     ├── agents.yaml
///     └── tasks.yaml
/// ```
///
/// Nothing is written when any of the files exists and `force` is unset.
/// Returns the written paths.
pub async fn generate_crew_project(options: InitOptions) -> InitResult<Vec<PathBuf>> {
    let root = &options.target_dir;

    if !options.force {
        if let Some(existing) = PROJECT_FILES
            .iter()
            .map(|(_, dest)| root.join(dest))
            .find(|path| path.exists())
        {
            return Err(InitError::FileExists(existing));
        }
    }

    let mut written = Vec::with_capacity(PROJECT_FILES.len());
    for (template, dest) in PROJECT_FILES {
        written.push(write_template_file(root, template, dest)?);
    }

    info!(root = %root.display(), files = written.len(), "Crew project initialized");
    Ok(written)
}

fn write_template_file(root: &Path, template_path: &str, dest: &str) -> InitResult<PathBuf> {
    let content = get_template(template_path)
        .ok_or_else(|| InitError::TemplateNotFound(template_path.to_string()))?;

    let target_path = root.join(dest);
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|source| InitError::DirectoryCreate {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&target_path, content).map_err(|source| InitError::FileWrite {
        path: target_path.clone(),
        source,
    })?;
    debug!(path = %target_path.display(), "Wrote template");

    Ok(target_path)
}
