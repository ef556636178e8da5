//! False-positive tests for deadsweep
//!
//! These tests check that code which IS used, through the mechanisms the
//! analyzer understands, is never reported as dead.
//!
//! Common categories:
//! 1. Imports in all their forms (static, re-export, dynamic, require)
//! 2. Directory imports resolving to an index module
//! 3. Components rendered in their own file
//! 4. Utilities called in their own file, or not exported at all
//! 5. Nested declarations that cannot be deleted on their own

use deadsweep::analysis::{Analyzer, Finding, FindingKind};
use deadsweep::config::Config;
use std::collections::HashSet;
use std::path::Path;
use tempfile::TempDir;

fn project(files: &[(&str, &str)]) -> TempDir {
    let temp = tempfile::tempdir().expect("Failed to create temp dir");
    for (rel, content) in files {
        let path = temp.path().join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).expect("Failed to write file");
    }
    temp
}

fn findings(root: &Path) -> Vec<Finding> {
    let config = Config::default();
    Analyzer::new(&config, root).findings().expect("Analysis failed")
}

/// Paths of unused files relative to the (canonical) project root
fn unused_files(root: &Path) -> HashSet<String> {
    let root = root.canonicalize().unwrap();
    findings(&root)
        .iter()
        .filter(|f| f.kind() == FindingKind::UnusedFile)
        .map(|f| {
            f.path()
                .strip_prefix(&root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

fn dead_names(root: &Path) -> HashSet<String> {
    findings(root)
        .iter()
        .filter_map(|f| f.name().map(str::to_string))
        .collect()
}

// ============================================================================
// 1. Import forms
// ============================================================================

#[test]
fn test_all_import_forms_mark_files_used() {
    let temp = project(&[
        (
            "entry.ts",
            r#"import def from './static';
import './side-effect';
export { thing } from './reexported';
export * from './star';
const lazy = import('./lazy');
const legacy = require('./legacy');
"#,
        ),
        ("static.ts", "export default 1;\n"),
        ("side-effect.ts", "console.log('loaded');\n"),
        ("reexported.ts", "export const thing = 1;\n"),
        ("star.ts", "export const star = 1;\n"),
        ("lazy.tsx", "export default null;\n"),
        ("legacy.js", "module.exports = {};\n"),
    ]);

    assert_eq!(unused_files(temp.path()), HashSet::from(["entry.ts".to_string()]));
}

#[test]
fn test_explicit_extension_and_parent_imports() {
    let temp = project(&[
        ("src/pages/home.ts", "import { api } from '../../lib/api.ts';\nimport '../shared';\n"),
        ("lib/api.ts", "export const api = {};\n"),
        ("src/shared.js", "export {};\n"),
    ]);

    assert_eq!(
        unused_files(temp.path()),
        HashSet::from(["src/pages/home.ts".to_string()])
    );
}

#[test]
fn test_package_imports_do_not_resolve_to_project_files() {
    let temp = project(&[
        ("main.ts", "import React from 'react';\nimport lodash from 'lodash';\n"),
        ("react.ts", "export {};\n"),
    ]);

    // A bare specifier is a package, never a sibling file
    assert!(unused_files(temp.path()).contains("react.ts"));
}

// ============================================================================
// 2. Directory imports
// ============================================================================

#[test]
fn test_directory_import_marks_index_used() {
    let temp = project(&[
        ("app.ts", "import { Button } from './components';\n"),
        ("components/index.ts", "export { Button } from './Button';\n"),
        ("components/Button.tsx", "export const Button = () => <button />;\n<Button />;\n"),
    ]);

    assert_eq!(unused_files(temp.path()), HashSet::from(["app.ts".to_string()]));
}

// ============================================================================
// 3. Components
// ============================================================================

#[test]
fn test_rendered_components_are_live() {
    let temp = project(&[(
        "App.jsx",
        r#"const Header = () => <header />;

function Footer() {
  return <footer />;
}

const Layout = function () {
  return (
    <div>
      <Header />
      <Footer></Footer>
    </div>
  );
};

<Layout />;
"#,
    )]);

    let names = dead_names(temp.path());
    assert!(!names.contains("Header"));
    assert!(!names.contains("Footer"));
    assert!(!names.contains("Layout"));
}

#[test]
fn test_lowercase_functions_are_not_components() {
    let temp = project(&[(
        "view.tsx",
        "export function renderRow() {\n  return <tr />;\n}\nrenderRow();\n",
    )]);

    assert!(dead_names(temp.path()).is_empty());
}

#[test]
fn test_custom_component_pattern() {
    let temp = project(&[(
        "ui.tsx",
        "function UiCard() {\n  return <div />;\n}\nfunction Helper() {\n  return null;\n}\nHelper();\n",
    )]);

    let mut config = Config::default();
    config.detection.component_pattern = "^Ui[A-Z]".to_string();
    let findings = Analyzer::new(&config, temp.path()).findings().unwrap();

    let components: Vec<&str> = findings
        .iter()
        .filter(|f| f.kind() == FindingKind::UnusedComponent)
        .filter_map(|f| f.name())
        .collect();
    assert_eq!(components, vec!["UiCard"]);
    // Helper is now a utility; it is called and not exported
    assert!(findings.iter().all(|f| f.name() != Some("Helper")));
}

// ============================================================================
// 4. Utilities
// ============================================================================

#[test]
fn test_called_and_private_utilities_are_live() {
    let temp = project(&[(
        "utils.ts",
        r#"export function slugify(s: string) {
  return s.toLowerCase();
}

export const titleCase = (s: string) => slugify(s);

function callbackOnly(x: number) {
  return x * 2;
}

[1, 2].map(callbackOnly);
titleCase('A');
"#,
    )]);

    assert!(dead_names(temp.path()).is_empty());
}

#[test]
fn test_non_function_exports_are_not_utilities() {
    let temp = project(&[(
        "constants.ts",
        "export const MAX = 10;\nexport const names = ['a'];\nexport let flag = true;\n",
    )]);

    assert!(dead_names(temp.path()).is_empty());
}

// ============================================================================
// 5. Nested declarations
// ============================================================================

#[test]
fn test_nested_declarations_are_never_reported() {
    let temp = project(&[(
        "hooks.tsx",
        r#"export function useThing() {
  function Inner() {
    return <span />;
  }
  const compute = () => 1;
  return compute;
}

useThing();
"#,
    )]);

    let names = dead_names(temp.path());
    assert!(!names.contains("Inner"));
    assert!(!names.contains("compute"));
    assert!(!names.contains("useThing"));
}
