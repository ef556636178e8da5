use super::cancel::CancellationToken;
use super::finding::{Finding, FindingCounts};
use super::unused_declarations::{find_unused_components, find_unused_utilities};
use super::unused_files::find_unused_files;
use super::usage::UsageExtractor;
use crate::config::{Config, ConfigError, ProjectScope};
use crate::discovery::{Dialect, DiscoveryError, FileFinder, FileStats, SourceFile};
use crate::graph::{extract_imports, module_id, ImportGraph, ImportRef};
use crate::parser::{ParseError, ScriptParser};
use rayon::prelude::*;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, info_span, trace, warn};

/// Errors that abort an analysis run
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Parser(#[from] ParseError),
    #[error("Parser unavailable on worker thread: {0}")]
    Grammar(String),
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Result of one analysis pass
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    /// Unused files first, then per-file components and utilities
    pub findings: Vec<Finding>,
    /// Files collected under the root
    pub files_analyzed: usize,
    /// Files skipped for declaration analysis after a syntax error
    pub parse_failures: Vec<PathBuf>,
}

impl AnalysisReport {
    pub fn counts(&self) -> FindingCounts {
        FindingCounts::from_findings(&self.findings)
    }
}

/// Per-file outcome, produced independently for every file
struct FileAnalysis {
    file: SourceFile,
    content: String,
    imports: Vec<ImportRef>,
    declarations: Vec<Finding>,
    parse_failed: bool,
}

/// Runs the full pipeline: discovery, import graph, unused files, unused
/// declarations. Stateless across runs.
pub struct Analyzer<'a> {
    config: &'a Config,
    root: PathBuf,
    cancel: CancellationToken,
}

impl<'a> Analyzer<'a> {
    pub fn new(config: &'a Config, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run analysis and return only the ordered findings
    pub fn findings(&self) -> Result<Vec<Finding>, AnalysisError> {
        self.run().map(|report| report.findings)
    }

    pub fn run(&self) -> Result<AnalysisReport, AnalysisError> {
        let span = info_span!("analysis", root = %self.root.display());
        let _guard = span.enter();
        let start_time = Instant::now();

        let component_pattern = self.config.component_regex()?;

        // Step 1: Discover files
        info!("Discovering files...");
        let files = FileFinder::new(self.config).find_files(&self.root)?;
        info!("Found {} files to analyze", files.len());
        let stats = FileStats::from_files(&files);
        debug!(
            "  {} .js, {} .jsx, {} .ts, {} .tsx",
            stats.javascript_files, stats.jsx_files, stats.typescript_files, stats.tsx_files
        );
        self.check_cancelled()?;

        let scope = ProjectScope::load(&self.root);

        // Step 2: Parse and extract, per file
        info!("Parsing files...");
        let analyses = self.analyze_files(files, &component_pattern, &scope)?;
        self.check_cancelled()?;

        // Step 3: Build import graph
        info!("Building import graph...");
        let mut graph = ImportGraph::new();
        for analysis in &analyses {
            graph.add_file(&analysis.file.path);
            graph.add_imports(&analysis.file.path, &analysis.imports);
        }
        debug!(
            "Import graph: {} modules, {} edges, {} resolved targets",
            graph.module_count(),
            graph.edge_count(),
            graph.resolved_targets().len()
        );
        for analysis in &analyses {
            let importers = graph.importers_of(&module_id(&analysis.file.path));
            trace!(
                "{} imported by {} files",
                analysis.file.path.display(),
                importers.len()
            );
        }

        // Step 4: Merge findings
        let mut findings = Vec::new();
        if self.config.detection.unused_files {
            findings.extend(find_unused_files(
                analyses
                    .iter()
                    .map(|a| (a.file.path.as_path(), a.content.as_str())),
                &graph,
            ));
        }

        let mut parse_failures = Vec::new();
        let files_analyzed = analyses.len();
        for analysis in analyses {
            if analysis.parse_failed {
                parse_failures.push(analysis.file.path);
            }
            findings.extend(analysis.declarations);
        }

        let counts = FindingCounts::from_findings(&findings);
        info!(
            "Analysis complete in {:.2}s: {}",
            start_time.elapsed().as_secs_f64(),
            counts
        );

        Ok(AnalysisReport {
            findings,
            files_analyzed,
            parse_failures,
        })
    }

    fn check_cancelled(&self) -> Result<(), AnalysisError> {
        if self.cancel.is_cancelled() {
            warn!("Analysis cancelled");
            return Err(AnalysisError::Cancelled);
        }
        Ok(())
    }

    /// Analyze every file, in parallel when configured. Output order always
    /// matches input order.
    fn analyze_files(
        &self,
        files: Vec<SourceFile>,
        component_pattern: &Regex,
        scope: &ProjectScope,
    ) -> Result<Vec<FileAnalysis>, AnalysisError> {
        let results: Vec<Option<FileAnalysis>> = if self.config.parallel {
            // Fail early on a grammar problem rather than once per worker
            ScriptParser::new()?;
            files
                .into_par_iter()
                .map_init(ScriptParser::new, |parser, file| match parser {
                    Ok(parser) => self.analyze_file(parser, file, component_pattern, scope),
                    Err(e) => Err(AnalysisError::Grammar(e.to_string())),
                })
                .collect::<Result<_, _>>()?
        } else {
            let mut parser = ScriptParser::new()?;
            files
                .into_iter()
                .map(|file| self.analyze_file(&mut parser, file, component_pattern, scope))
                .collect::<Result<_, _>>()?
        };

        Ok(results.into_iter().flatten().collect())
    }

    fn analyze_file(
        &self,
        parser: &mut ScriptParser,
        file: SourceFile,
        component_pattern: &Regex,
        scope: &ProjectScope,
    ) -> Result<Option<FileAnalysis>, AnalysisError> {
        self.check_cancelled()?;
        debug!("Analyzing file: {}", file.path.display());

        let content = match file.read_contents() {
            Ok(content) => content,
            Err(e) => {
                warn!("Skipping unreadable file {}: {}", file.path.display(), e);
                return Ok(None);
            }
        };

        // Files outside the tsconfig project keep their imports
        let in_project = scope.admits(&file.path);
        if !in_project {
            debug!("Not in tsconfig project, skipping declarations: {}", file.path.display());
        }

        let (imports, declarations, parse_failed) = self.extract(
            parser,
            &file.path,
            &content,
            file.dialect,
            component_pattern,
            in_project,
        );

        Ok(Some(FileAnalysis {
            file,
            content,
            imports,
            declarations,
            parse_failed,
        }))
    }

    fn extract(
        &self,
        parser: &mut ScriptParser,
        path: &Path,
        content: &str,
        dialect: Dialect,
        component_pattern: &Regex,
        in_project: bool,
    ) -> (Vec<ImportRef>, Vec<Finding>, bool) {
        let module = match parser.parse(path, content, dialect) {
            Ok(module) => module,
            Err(e) => {
                warn!("Failed to parse {}: {}", path.display(), e);
                return (Vec::new(), Vec::new(), true);
            }
        };

        let imports = extract_imports(module.root(), content);

        let detection = &self.config.detection;
        if !in_project || (!detection.unused_components && !detection.unused_utilities) {
            return (imports, Vec::new(), false);
        }

        let tree = match module.syntax_tree() {
            Ok(tree) => tree,
            Err(e) => {
                warn!("Skipping component/utility analysis: {}", e);
                return (imports, Vec::new(), true);
            }
        };

        trace!(
            "{}: {} top-level symbols, {} exported",
            path.display(),
            module.symbols().len(),
            module.symbols().iter().filter(|s| s.exported).count()
        );

        let usage = UsageExtractor::new(component_pattern).extract(tree.root_node(), content);
        let mut declarations = Vec::new();
        if detection.unused_components {
            declarations.extend(find_unused_components(path, &usage, module.symbols()));
        }
        if detection.unused_utilities {
            declarations.extend(find_unused_utilities(path, &usage, module.symbols()));
        }

        (imports, declarations, false)
    }
}
