//! Integration tests for the deletion engine
//!
//! These tests apply deletion batches to real files in temporary directories
//! and check both the edited files and the backups left behind.

use deadsweep::analysis::{Analyzer, FindingKind};
use deadsweep::config::Config;
use deadsweep::refactor::{Deleter, DeletionBatch, DeletionRequest};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn numbered_lines(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("const line{} = {};", i, i)).collect()
}

fn file_request(path: &Path) -> DeletionRequest {
    DeletionRequest {
        kind: FindingKind::UnusedFile,
        path: path.to_path_buf(),
        start_line: None,
        end_line: None,
        name: None,
    }
}

fn range_request(path: &Path, start: usize, end: usize) -> DeletionRequest {
    DeletionRequest {
        kind: FindingKind::UnusedComponent,
        path: path.to_path_buf(),
        start_line: Some(start),
        end_line: Some(end),
        name: None,
    }
}

fn backups_in(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Backup directory missing")
        .map(|e| e.unwrap().path())
        .collect();
    entries.sort();
    entries
}

// ============================================================================
// Whole files
// ============================================================================

#[test]
fn test_file_deletion_with_backup_round_trip() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("src").join("orphan.ts");
    std::fs::create_dir_all(target.parent().unwrap()).unwrap();
    let original = "export const orphan = true;\r\n// trailing\n";
    std::fs::write(&target, original).unwrap();

    let result = Deleter::new(temp.path(), "backups").apply(&[file_request(&target)], true);

    assert!(result.is_success());
    assert!(!target.exists());

    let backup = temp.path().join("backups").join("orphan.ts");
    assert_eq!(std::fs::read(&backup).unwrap(), original.as_bytes());
    assert_eq!(result.deleted[0].backup_path.as_deref(), Some(backup.as_path()));
}

#[test]
fn test_file_deletion_without_backup() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("orphan.js");
    std::fs::write(&target, "x").unwrap();

    let result = Deleter::new(temp.path(), "backups").apply(&[file_request(&target)], false);

    assert!(result.is_success());
    assert!(!target.exists());
    assert!(!temp.path().join("backups").exists());
}

#[test]
fn test_same_base_name_backups_do_not_collide() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("a").join("index.ts");
    let second = temp.path().join("b").join("index.ts");
    for (path, body) in [(&first, "first"), (&second, "second")] {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    let result = Deleter::new(temp.path(), "backups")
        .apply(&[file_request(&first), file_request(&second)], true);

    assert!(result.is_success());
    let backups = backups_in(&temp.path().join("backups"));
    assert_eq!(backups.len(), 2);
    let mut contents: Vec<String> = backups
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();
    contents.sort();
    assert_eq!(contents, vec!["first", "second"]);
}

// ============================================================================
// Line ranges
// ============================================================================

#[test]
fn test_range_deletion_removes_exact_lines() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("Page.tsx");
    let lines = numbered_lines(20);
    std::fs::write(&target, lines.join("\n")).unwrap();

    let result = Deleter::new(temp.path(), "backups").apply(&[range_request(&target, 10, 12)], true);
    assert!(result.is_success());

    let remaining: Vec<String> = std::fs::read_to_string(&target)
        .unwrap()
        .split('\n')
        .map(str::to_string)
        .collect();
    assert_eq!(remaining.len(), 17);
    let expected: Vec<String> = lines[..9].iter().chain(&lines[12..]).cloned().collect();
    assert_eq!(remaining, expected);

    let backup = result.deleted[0].backup_path.clone().unwrap();
    let name = backup.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("Page.tsx.backup_"));
    assert!(name.ends_with(".txt"));
    assert_eq!(std::fs::read_to_string(backup).unwrap(), lines[9..12].join("\n"));
}

#[test]
fn test_multiple_ranges_in_one_file() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("utils.ts");
    let lines = numbered_lines(12);
    std::fs::write(&target, format!("{}\n", lines.join("\n"))).unwrap();

    let requests = vec![
        range_request(&target, 1, 2),
        range_request(&target, 5, 6),
        range_request(&target, 10, 12),
    ];
    let result = Deleter::new(temp.path(), "backups").apply(&requests, true);

    assert!(result.is_success());
    assert_eq!(result.deleted.len(), 3);

    let expected = format!(
        "{}\n",
        [&lines[2], &lines[3], &lines[6], &lines[7], &lines[8]]
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    );
    assert_eq!(std::fs::read_to_string(&target).unwrap(), expected);

    // One backup per range, none overwritten
    assert_eq!(backups_in(&temp.path().join("backups")).len(), 3);
}

#[test]
fn test_invalid_range_is_reported_per_item() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a.ts");
    std::fs::write(&target, numbered_lines(3).join("\n")).unwrap();
    let other = temp.path().join("b.ts");
    std::fs::write(&other, numbered_lines(3).join("\n")).unwrap();

    let requests = vec![range_request(&target, 2, 9), range_request(&other, 1, 1)];
    let result = Deleter::new(temp.path(), "backups").apply(&requests, false);

    assert_eq!(result.failed.len(), 1);
    assert!(result.failed[0].error.contains("Invalid line range"));
    assert_eq!(result.deleted.len(), 1);
    assert_eq!(std::fs::read_to_string(&target).unwrap(), numbered_lines(3).join("\n"));
}

#[test]
fn test_missing_range_is_reported() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("a.ts");
    std::fs::write(&target, "x\n").unwrap();

    let mut request = range_request(&target, 1, 1);
    request.end_line = None;
    let result = Deleter::new(temp.path(), "backups").apply(&[request], false);

    assert!(!result.is_success());
    assert!(result.failed[0].error.contains("no line range"));
}

// ============================================================================
// Analysis to deletion
// ============================================================================

#[test]
fn test_findings_feed_deletion_batch() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("index.ts"), "import './lib';\n").unwrap();
    std::fs::write(
        temp.path().join("lib.ts"),
        "export function keep() {\n  return 1;\n}\n\nexport function drop() {\n  return 2;\n}\n\nkeep();\n",
    )
    .unwrap();

    let config = Config::default();
    let findings = Analyzer::new(&config, temp.path()).findings().unwrap();
    let requests: Vec<DeletionRequest> = findings
        .iter()
        .filter(|f| f.kind() == FindingKind::UnusedUtility)
        .map(DeletionRequest::from)
        .collect();
    assert_eq!(requests.len(), 1);

    let result = Deleter::new(temp.path(), "backups").apply(&requests, false);
    assert!(result.is_success());
    assert_eq!(
        std::fs::read_to_string(temp.path().join("lib.ts")).unwrap(),
        "export function keep() {\n  return 1;\n}\n\n\nkeep();\n"
    );

    // A second pass over the edited tree finds no utilities
    let findings = Analyzer::new(&config, temp.path()).findings().unwrap();
    assert!(findings.iter().all(|f| f.kind() != FindingKind::UnusedUtility));
}

#[test]
fn test_batch_json_round_trip_through_deleter() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("gone.ts");
    std::fs::write(&target, "x").unwrap();

    let json = r#"{"items":[{"type":"unused_file","filePath":"gone.ts"}],"backupEnabled":true}"#;
    let batch: DeletionBatch = serde_json::from_str(json).unwrap();
    let result = Deleter::new(temp.path(), "backups").apply(&batch.items, batch.backup_enabled);

    assert!(result.is_success());
    assert!(!target.exists());
    assert!(temp.path().join("backups").join("gone.ts").exists());

    let serialized = serde_json::to_value(&result).unwrap();
    assert_eq!(serialized["deleted"][0]["request"]["type"], "unused_file");
    assert!(serialized["failed"].as_array().unwrap().is_empty());
}

#[test]
fn test_backups_are_not_reanalyzed() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("a.ts"), "import { b } from './b';\nb();\n").unwrap();
    std::fs::write(temp.path().join("b.ts"), "export function b() {}\nb();\n").unwrap();
    std::fs::write(temp.path().join("c.ts"), "export const c = 1;\n").unwrap();

    let config = Config::default();
    let findings = Analyzer::new(&config, temp.path()).findings().unwrap();
    let requests: Vec<DeletionRequest> = findings
        .iter()
        .filter(|f| f.kind() == FindingKind::UnusedFile && f.path().ends_with("c.ts"))
        .map(DeletionRequest::from)
        .collect();
    assert_eq!(requests.len(), 1);

    let result = Deleter::new(temp.path(), &config.backup_dir).apply(&requests, true);
    assert!(result.is_success());
    assert!(temp.path().join("backups").join("c.ts").exists());

    let findings = Analyzer::new(&config, temp.path()).findings().unwrap();
    assert!(findings
        .iter()
        .all(|f| !f.path().components().any(|c| c.as_os_str() == "backups")));
    let unused: Vec<String> = findings
        .iter()
        .filter(|f| f.kind() == FindingKind::UnusedFile)
        .map(|f| f.path().file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(unused, vec!["a.ts"]);
}
