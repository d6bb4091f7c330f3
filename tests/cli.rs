//! CLI integration tests for the clustercheck binary

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_list_shows_cluster_version_check() {
    let mut cmd = Command::cargo_bin("clustercheck").unwrap();
    cmd.arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster-version"));
}

#[test]
fn test_list_plain_format() {
    let mut cmd = Command::cargo_bin("clustercheck").unwrap();
    cmd.args(["list", "-f", "plain"])
        .assert()
        .success()
        .stdout(predicate::eq("cluster-version\n"));
}

#[test]
fn test_list_json_format() {
    let mut cmd = Command::cargo_bin("clustercheck").unwrap();
    let output = cmd.args(["list", "-f", "json"]).output().unwrap();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed[0]["id"], "cluster-version");
}

#[test]
fn test_cluster_version_check_passes() {
    // The stub check reports clean, so the process exits 0 with no output.
    let mut cmd = Command::cargo_bin("clustercheck").unwrap();
    cmd.arg("cluster-version")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_unknown_subcommand_fails() {
    let mut cmd = Command::cargo_bin("clustercheck").unwrap();
    cmd.arg("no-such-check").assert().failure();
}

#[test]
fn test_config_override_is_accepted() {
    let dir = tempfile::TempDir::new().unwrap();
    let config_path = dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        r#"
        [defaults]
        check_timeout = 30
        "#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("clustercheck").unwrap();
    cmd.args(["-c", config_path.to_str().unwrap(), "cluster-version"])
        .assert()
        .success();
}
