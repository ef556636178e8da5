//! Import graph: which modules of the project are imported by which files.

mod imports;

pub use imports::{extract_imports, ImportKind, ImportRef};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};
use std::path::{Component, Path, PathBuf};

/// Extensions stripped from module identities
const MODULE_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// An import edge between two module identities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub kind: ImportKind,
    pub specifier: String,
    /// Line of the import in the importing file (1-indexed)
    pub line: usize,
}

/// Directed graph of module identities; an edge points from the importing
/// file to the module it resolves to.
#[derive(Debug, Default)]
pub struct ImportGraph {
    inner: DiGraph<PathBuf, ImportEdge>,
    node_map: HashMap<PathBuf, NodeIndex>,
}

impl ImportGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, id: PathBuf) -> NodeIndex {
        if let Some(&idx) = self.node_map.get(&id) {
            return idx;
        }
        let idx = self.inner.add_node(id.clone());
        self.node_map.insert(id, idx);
        idx
    }

    /// Register a project file so it is known even if nothing imports it
    pub fn add_file(&mut self, file: &Path) {
        self.node(module_id(file));
    }

    /// Record the imports of `file`. Package specifiers are ignored; a
    /// relative specifier also marks the `index` module of a directory.
    pub fn add_imports(&mut self, file: &Path, imports: &[ImportRef]) {
        let from = self.node(module_id(file));

        for import in imports.iter().filter(|i| i.is_relative()) {
            let Some(target) = resolve_specifier(file, &import.specifier) else {
                continue;
            };

            let edge = ImportEdge {
                kind: import.kind,
                specifier: import.specifier.clone(),
                line: import.line,
            };

            let index_target = target.join("index");
            let to = self.node(target);
            self.inner.add_edge(from, to, edge.clone());
            let to_index = self.node(index_target);
            self.inner.add_edge(from, to_index, edge);
        }
    }

    /// Whether any file imports the module with this identity
    pub fn is_imported(&self, id: &Path) -> bool {
        let Some(&idx) = self.node_map.get(id) else {
            return false;
        };
        self.inner
            .edges_directed(idx, Direction::Incoming)
            .next()
            .is_some()
    }

    /// Every module identity some file imports (set semantics)
    pub fn resolved_targets(&self) -> HashSet<&Path> {
        self.inner
            .edge_references()
            .map(|edge| self.inner[edge.target()].as_path())
            .collect()
    }

    /// Module identities of the files importing `id`
    pub fn importers_of(&self, id: &Path) -> Vec<&Path> {
        let Some(&idx) = self.node_map.get(id) else {
            return Vec::new();
        };
        let mut importers: Vec<&Path> = self
            .inner
            .edges_directed(idx, Direction::Incoming)
            .map(|edge| self.inner[edge.source()].as_path())
            .collect();
        importers.sort();
        importers.dedup();
        importers
    }

    pub fn module_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
}

/// Canonical module identity: lexically normalized, script extension removed
pub fn module_id(path: &Path) -> PathBuf {
    let normalized = normalize_path(path);
    match normalized.extension().and_then(|e| e.to_str()) {
        Some(ext) if MODULE_EXTENSIONS.contains(&ext) => normalized.with_extension(""),
        _ => normalized,
    }
}

/// Resolve a relative specifier against the importing file's directory
pub fn resolve_specifier(importer: &Path, specifier: &str) -> Option<PathBuf> {
    if !specifier.starts_with('.') {
        return None;
    }
    let dir = importer.parent().unwrap_or_else(|| Path::new(""));
    Some(module_id(&dir.join(specifier)))
}

/// Collapse `.` and `..` without touching the file system
fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
            _ => result.push(component.as_os_str()),
        }
    }
    result
}
