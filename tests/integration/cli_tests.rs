//! CLI integration tests
//!
//! These tests verify that the CLI works correctly with various options.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

fn deadsweep() -> Command {
    Command::cargo_bin("deadsweep").expect("Binary not built")
}

fn sample_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    std::fs::write(root.join("main.ts"), "import { used } from './used';\nused();\n").unwrap();
    std::fs::write(
        root.join("used.ts"),
        "export function used() {}\nexport function neverCalled() {}\n",
    )
    .unwrap();
    std::fs::write(root.join("stale.js"), "console.log('stale');\n").unwrap();
    temp
}

fn json_findings(root: &Path) -> Vec<Value> {
    let output = deadsweep()
        .arg(root)
        .args(["--format", "json", "--quiet"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice::<Value>(&output.stdout)
        .expect("stdout is not JSON")
        .as_array()
        .cloned()
        .unwrap()
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    deadsweep()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadsweep"))
        .stdout(predicate::str::contains("--apply"))
        .stdout(predicate::str::contains("--no-parallel"));
}

#[test]
fn test_cli_version() {
    deadsweep()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("deadsweep"));
}

#[test]
fn test_cli_missing_path_fails() {
    deadsweep()
        .arg("/definitely/not/a/project")
        .arg("--quiet")
        .assert()
        .failure();
}

// ============================================================================
// Output
// ============================================================================

#[test]
fn test_cli_json_output() {
    let project = sample_project();
    let findings = json_findings(project.path());

    let types: Vec<&str> = findings.iter().map(|f| f["type"].as_str().unwrap()).collect();
    assert_eq!(
        types,
        vec!["unused_file", "unused_file", "unused_utility", "unused_utility"]
    );

    assert!(findings[0]["path"].as_str().unwrap().ends_with("main.ts"));
    assert!(findings[1]["path"].as_str().unwrap().ends_with("stale.js"));

    // Calls from other files do not count as usage
    assert_eq!(findings[2]["name"], "used");
    assert_eq!(findings[3]["name"], "neverCalled");
    assert_eq!(findings[3]["startLine"], 2);
    assert_eq!(findings[3]["endLine"], 2);
}

#[test]
fn test_cli_json_output_file() {
    let project = sample_project();
    let out = project.path().join("report.json");

    deadsweep()
        .arg(project.path())
        .args(["--format", "json", "--quiet", "--output"])
        .arg(&out)
        .assert()
        .success();

    let value: Value = serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
}

#[test]
fn test_cli_terminal_output() {
    let project = sample_project();
    deadsweep()
        .arg(project.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unused files"))
        .stdout(predicate::str::contains("neverCalled"))
        .stdout(predicate::str::contains("2 unused files, 0 unused components, 2 unused utilities"));
}

#[test]
fn test_cli_exclude_pattern() {
    let project = sample_project();
    let output = deadsweep()
        .arg(project.path())
        .args(["--format", "json", "--quiet", "--exclude", "*.js"])
        .output()
        .unwrap();
    let findings: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(findings
        .as_array()
        .unwrap()
        .iter()
        .all(|f| !f["path"].as_str().unwrap_or("").ends_with("stale.js")));
}

// ============================================================================
// Deletion batches
// ============================================================================

#[test]
fn test_cli_apply_batch() {
    let project = sample_project();
    let batch = project.path().join("batch.json");
    std::fs::write(
        &batch,
        r#"{"items":[{"type":"unused_file","path":"stale.js"},{"type":"unused_utility","filePath":"used.ts","startLine":2,"endLine":2,"name":"neverCalled"}],"backupEnabled":true}"#,
    )
    .unwrap();

    let output = deadsweep()
        .arg(project.path())
        .arg("--quiet")
        .arg("--apply")
        .arg(&batch)
        .output()
        .unwrap();
    assert!(output.status.success());

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["deleted"].as_array().unwrap().len(), 2);
    assert!(result["failed"].as_array().unwrap().is_empty());

    assert!(!project.path().join("stale.js").exists());
    assert!(project.path().join("backups").join("stale.js").exists());
    assert_eq!(
        std::fs::read_to_string(project.path().join("used.ts")).unwrap(),
        "export function used() {}\n"
    );
}

#[test]
fn test_cli_apply_reports_failures() {
    let project = sample_project();
    let batch = project.path().join("batch.json");
    std::fs::write(
        &batch,
        r#"{"items":[{"type":"unused_file","path":"missing.ts"}],"backupEnabled":false}"#,
    )
    .unwrap();

    deadsweep()
        .arg(project.path())
        .arg("--quiet")
        .arg("--apply")
        .arg(&batch)
        .assert()
        .failure()
        .stdout(predicate::str::contains("no longer exists"));
}
