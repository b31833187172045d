//! Project templates embedded at compile time.
//!
//! Files under the workspace `templates/` directory are compiled into the
//! binary so `crew init` works without any files on disk.

use rust_embed::RustEmbed;

/// Embedded files from the workspace `templates/` directory
/// (`CARGO_MANIFEST_DIR` is `crates/core`).
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path, e.g. `"config/agents.yaml"`.
///
/// # Example
/// ```
/// use ck_core::init::templates::get_template;
///
/// let settings = get_template("crew.toml").expect("crew.toml should exist");
/// assert!(settings.contains("process ="));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ck_protocol::agent_models::AgentSpec;
    use ck_protocol::config_models::GlobalConfig;
    use ck_protocol::task_models::TaskSpec;
    use std::collections::BTreeMap;

    #[test]
    fn test_settings_template_parses() {
        let content = get_template("crew.toml").expect("crew.toml should be embedded");
        let config: GlobalConfig = toml::from_str(&content).expect("valid crew.toml");
        assert!(config.verbose);
    }

    #[test]
    fn test_agents_template_has_every_role() {
        let content = get_template("config/agents.yaml").expect("agents.yaml should be embedded");
        let agents: BTreeMap<String, AgentSpec> =
            serde_yaml::from_str(&content).expect("valid agents.yaml");
        for key in ["researcher", "analyst", "coding_agent", "overlord"] {
            assert!(agents.contains_key(key), "missing agent {key}");
        }
        assert!(agents["researcher"].role.contains("{topic}"));
    }

    #[test]
    fn test_tasks_template_has_every_role() {
        let content = get_template("config/tasks.yaml").expect("tasks.yaml should be embedded");
        let tasks: BTreeMap<String, TaskSpec> =
            serde_yaml::from_str(&content).expect("valid tasks.yaml");
        for key in ["research_task", "analyst_task", "coding_task", "overlord_task"] {
            assert!(tasks.contains_key(key), "missing task {key}");
        }
        assert_eq!(tasks["coding_task"].agent.as_deref(), Some("coding_agent"));
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }

    #[test]
    fn test_every_project_file_is_embedded() {
        for (template, _) in crate::init::PROJECT_FILES {
            assert!(get_template(template).is_some(), "missing template {template}");
        }
        assert_eq!(TemplateAssets::iter().count(), crate::init::PROJECT_FILES.len());
    }
}
