use ck_protocol::*;
use std::collections::BTreeMap;

#[test]
fn test_agent_spec_deserialization_from_yaml() {
    let yaml_str = r#"
researcher:
  role: "Senior Researcher"
  goal: "Uncover developments in {topic}"
  backstory: >
    Seasoned researcher.
"#;

    let agents: BTreeMap<String, AgentSpec> =
        serde_yaml::from_str(yaml_str).expect("Failed to deserialize agents");

    let researcher = &agents["researcher"];
    assert_eq!(researcher.role, "Senior Researcher");
    assert_eq!(researcher.goal, "Uncover developments in {topic}");
    assert_eq!(researcher.backstory.trim(), "Seasoned researcher.");
    // name comes from the mapping key, not the body
    assert_eq!(researcher.name, "");
}

#[test]
fn test_agent_spec_missing_field_is_an_error() {
    let yaml_str = r#"
analyst:
  role: "Analyst"
  goal: "Analyze"
"#;

    let result: Result<BTreeMap<String, AgentSpec>, _> = serde_yaml::from_str(yaml_str);
    assert!(result.is_err(), "backstory is required");
}

#[test]
fn test_task_spec_agent_is_optional() {
    let yaml_str = r#"
research_task:
  description: "Research {topic}"
  expected_output: "Ten bullet points"
  agent: researcher
coding_task:
  description: "Implement it"
  expected_output: "Working code"
"#;

    let tasks: BTreeMap<String, TaskSpec> =
        serde_yaml::from_str(yaml_str).expect("Failed to deserialize tasks");

    assert_eq!(tasks["research_task"].agent.as_deref(), Some("researcher"));
    assert_eq!(tasks["coding_task"].agent, None);
}

#[test]
fn test_global_config_defaults_from_partial_document() {
    // serde(default) at the struct level fills every missing field
    let yaml_str = "process: sequential\nmax_iter: 3\n";
    let config: GlobalConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");

    assert_eq!(config.process, ProcessKind::Sequential);
    assert_eq!(config.max_iter, 3);
    assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    assert_eq!(config.results_dir, "results");
    assert!(config.stream);
}

#[test]
fn test_process_kind_serialization() {
    let json = serde_json::to_value(ProcessKind::Hierarchical).expect("Failed to serialize");
    assert_eq!(json, "hierarchical");
}

#[test]
fn test_inputs_untagged_values() {
    let json = r#"{"topic": "AI LLMs", "requirements": ["fast", "small"]}"#;
    let inputs: Inputs = serde_json::from_str(json).expect("Failed to deserialize Inputs");

    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs.topic(), Some("AI LLMs"));
    assert_eq!(
        inputs.get("requirements"),
        Some(&InputValue::List(vec!["fast".to_string(), "small".to_string()]))
    );
    assert_eq!(
        inputs.get("requirements").map(InputValue::render).as_deref(),
        Some("- fast\n- small")
    );
}

#[test]
fn test_run_status_serialization() {
    let json = serde_json::to_value(RunStatus::Running).expect("Failed to serialize RunStatus");
    assert_eq!(json, "RUNNING");

    let deserialized: RunStatus =
        serde_json::from_value(json).expect("Failed to deserialize RunStatus");
    assert_eq!(deserialized, RunStatus::Running);
}

#[test]
fn test_run_record_serialization() {
    use uuid::Uuid;

    let task_id = Uuid::new_v4();
    let record = RunRecord {
        run_id: Uuid::new_v4(),
        crew_name: "crew".to_string(),
        status: RunStatus::Completed,
        inputs: Inputs::new().with("topic", "X"),
        tasks_output: vec![TaskOutput {
            task_id,
            task_name: "research_task".to_string(),
            agent_role: "Researcher".to_string(),
            description: "Research X".to_string(),
            raw: "findings".to_string(),
            output_file: "results/research_report.md".into(),
        }],
        started_at: chrono::Utc::now(),
        completed_at: None,
    };

    let json = serde_json::to_string(&record).expect("Failed to serialize RunRecord");
    let back: RunRecord = serde_json::from_str(&json).expect("Failed to deserialize RunRecord");

    assert_eq!(back.run_id, record.run_id);
    assert_eq!(back.inputs.topic(), Some("X"));
    assert_eq!(back.tasks_output[0].task_id, task_id);
}

#[test]
fn test_event_tagged_serialization() {
    use uuid::Uuid;

    let run_id = Uuid::new_v4();
    let event = Event::TaskStarted {
        run_id,
        task_name: "research_task".to_string(),
        agent_role: "Researcher".to_string(),
    };

    let json = serde_json::to_value(&event).expect("Failed to serialize Event");
    assert_eq!(json["type"], "taskStarted");
    assert_eq!(json["payload"]["task_name"], "research_task");

    let back: Event = serde_json::from_value(json).expect("Failed to deserialize Event");
    assert_eq!(back, event);
}
