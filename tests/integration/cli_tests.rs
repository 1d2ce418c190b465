use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;

/// Binary isolated from the developer's config and Azure environment
fn foundry_agent(home: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("foundry-agent"));
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("AZURE_AI_PROJECT_ENDPOINT")
        .env_remove("FOUNDRY_API_VERSION")
        .env_remove("FOUNDRY_DEPLOY_SCRIPT")
        .env_remove("FOUNDRY_ACCESS_TOKEN")
        .env_remove("FOUNDRY_AGENT_LOG")
        .env_remove("MODEL_NAME");
    cmd
}

#[test]
fn test_help_output() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Create, test and manage Azure AI Foundry prompt agents",
        ))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_format() {
    let dir = tempfile::tempdir().unwrap();
    let output = foundry_agent(dir.path()).arg("--version").assert().success();
    let stdout = String::from_utf8_lossy(&output.get_output().stdout);

    assert!(stdout.starts_with("foundry-agent "));
    let version_part = stdout.strip_prefix("foundry-agent ").unwrap().trim();
    assert!(
        version_part.chars().next().unwrap().is_numeric(),
        "Version should start with a number: {}",
        version_part
    );

    #[cfg(not(debug_assertions))]
    assert!(
        !version_part.contains("-dev"),
        "Release build version should not contain -dev: {}",
        version_part
    );
}

#[test]
fn test_create_help() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .args(["create", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--filter"))
        .stdout(predicate::str::contains("--test"))
        .stdout(predicate::str::contains("--yes"));
}

#[test]
fn test_create_requires_file() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .arg("create")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("<FILE>"));
}

#[test]
fn test_unknown_command() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .arg("deploy-everything")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_create_missing_definition_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .args(["create", "does-not-exist.md", "--yes"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("❌"));
}

#[test]
fn test_test_without_endpoint_or_file() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .args(["test", "some-agent"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Provide either an .agent.txt file or agent-name + endpoint",
        ));
}

#[test]
fn test_test_with_unparseable_sidecar() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("bot.agent.txt"), "nothing here\n").unwrap();
    foundry_agent(dir.path())
        .args(["test", "bot.agent.txt"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Could not parse agent name and endpoint"));
}

#[test]
fn test_list_requires_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("AZURE_AI_PROJECT_ENDPOINT"));
}

#[test]
fn test_pirate_requires_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .args(["pirate", "list"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("AZURE_AI_PROJECT_ENDPOINT"));
}

#[test]
fn test_delete_declined_does_nothing() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .args([
            "delete",
            "bot",
            "--endpoint",
            "https://r.services.ai.azure.com/api/projects/p",
        ])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[test]
fn test_config_show_defaults() {
    let dir = tempfile::tempdir().unwrap();
    foundry_agent(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_version: 2025-11-15-preview"))
        .stdout(predicate::str::contains("max_name_attempts: 5"))
        .stdout(predicate::str::contains("finetune"));
}

#[test]
fn test_config_show_precedence() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".foundry-agent.toml"),
        "[azure]\ncli = \"/opt/az\"\napi_version = \"project\"\n\n[agent]\nmax_name_attempts = 0\n",
    )
    .unwrap();

    foundry_agent(dir.path())
        .args(["config", "show"])
        .env("FOUNDRY_API_VERSION", "from-env")
        .assert()
        .success()
        .stdout(predicate::str::contains("cli: /opt/az"))
        .stdout(predicate::str::contains("api_version: from-env"))
        .stdout(predicate::str::contains("max_name_attempts: unbounded"));
}

#[test]
fn test_config_validate_rejects_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".foundry-agent.toml"), "[azure\ncli = ").unwrap();

    foundry_agent(dir.path())
        .args(["config", "validate"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Configuration is invalid"));
}

#[test]
fn test_invalid_config_fails_other_commands() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(".foundry-agent.toml"), "[agent]\nmax_name_attempts = \"many\"\n").unwrap();

    foundry_agent(dir.path())
        .arg("list")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Config parse error"));
}
