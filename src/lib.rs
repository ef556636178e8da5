//! deadsweep - Dead code detection for JavaScript/TypeScript projects
//!
//! Finds files that nothing imports, components that are never rendered in
//! their own file, and exported utilities that are never called in their own
//! file. Findings can be fed back to a guarded deletion engine that removes
//! whole files or line ranges, optionally writing backups first.
//!
//! # Architecture
//!
//! The analysis pipeline consists of:
//! 1. **File Discovery** - Find all .js, .jsx, .ts and .tsx files
//! 2. **Parsing** - Parse each file once using tree-sitter
//! 3. **Import Graph** - Resolve relative imports into a module graph
//! 4. **Classification** - Unused files, then per-file components and utilities
//! 5. **Reporting** - Terminal or JSON output
//! 6. **Deletion** - Apply selected findings, with optional backups

pub mod analysis;
pub mod config;
pub mod discovery;
pub mod graph;
pub mod parser;
pub mod refactor;
pub mod report;

pub use analysis::{AnalysisError, AnalysisReport, Analyzer, CancellationToken, Finding, FindingKind};
pub use config::Config;
pub use discovery::FileFinder;
pub use refactor::{BatchResult, Deleter, DeletionBatch, DeletionRequest, SafeDeleter};
pub use report::{ReportFormat, Reporter};
