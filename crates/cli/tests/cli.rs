//! End-to-end tests of the `crew` binary.
//!
//! Only commands that never reach a model server are exercised here.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn crew() -> Command {
    let mut cmd = Command::cargo_bin("crew").unwrap();
    cmd.env("RUST_LOG", "off");
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    crew()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("run")
                .and(predicate::str::contains("train"))
                .and(predicate::str::contains("replay"))
                .and(predicate::str::contains("test"))
                .and(predicate::str::contains("init")),
        );
}

#[test]
fn test_init_writes_project() {
    let dir = tempdir().unwrap();

    crew()
        .arg("init")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    assert!(dir.path().join("crew.toml").is_file());
    assert!(dir.path().join("config/agents.yaml").is_file());
    assert!(dir.path().join("config/tasks.yaml").is_file());
}

#[test]
fn test_init_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    crew().arg("init").arg(dir.path()).assert().success();

    crew()
        .arg("init")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    crew()
        .args(["init", "--force"])
        .arg(dir.path())
        .assert()
        .success();
}

#[test]
fn test_tasks_without_previous_run() {
    let dir = tempdir().unwrap();

    crew()
        .arg("-C")
        .arg(dir.path())
        .arg("tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("No previous run found"));
}

#[test]
fn test_replay_without_previous_run() {
    let dir = tempdir().unwrap();

    crew()
        .arg("-C")
        .arg(dir.path())
        .args(["replay", "research_task"])
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("An error occurred while replaying the crew")
                .and(predicate::str::contains("No previous run")),
        );
}

#[test]
fn test_train_needs_an_iteration() {
    let dir = tempdir().unwrap();

    crew()
        .arg("-C")
        .arg(dir.path())
        .args(["train", "0", "training.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "An error occurred while training the crew",
        ));

    assert!(!dir.path().join("training.json").exists());
}

#[test]
fn test_iterations_must_be_numeric() {
    crew()
        .args(["test", "many", "llama3.2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
