use crate::config::Config;
use ignore::overrides::{Override, OverrideBuilder};
use ignore::WalkBuilder;
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

/// File discovery errors
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("File enumeration timed out after {limit:?} ({files_seen} files seen)")]
    Timeout { limit: Duration, files_seen: usize },
    #[error("Project root does not exist: {path}")]
    MissingRoot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },
}

/// Language dialect of a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl Dialect {
    /// Determine dialect from path
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Dialect::JavaScript),
            "jsx" => Some(Dialect::Jsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }
}

/// Represents a discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path to the file
    pub path: PathBuf,

    /// Dialect, from the extension
    pub dialect: Dialect,
}

impl SourceFile {
    pub fn new(path: PathBuf, dialect: Dialect) -> Self {
        Self { path, dialect }
    }

    /// Read the file's current contents
    pub fn read_contents(&self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// File finder for discovering source files in a project
pub struct FileFinder<'a> {
    config: &'a Config,
}

impl<'a> FileFinder<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Find all source files below `root`, sorted by path.
    ///
    /// Fails with [`DiscoveryError::Timeout`] if the walk exceeds the
    /// configured time budget; no partial result is returned in that case.
    pub fn find_files(&self, root: &Path) -> Result<Vec<SourceFile>, DiscoveryError> {
        let root = root
            .canonicalize()
            .map_err(|source| DiscoveryError::MissingRoot {
                path: root.to_path_buf(),
                source,
            })?;

        debug!("Scanning for files in: {}", root.display());

        let limit = self.config.discovery_timeout();
        let deadline = Instant::now() + limit;
        let overrides = self.build_overrides(&root)?;
        let respect_ignore = self.config.respect_gitignore;

        let walker = WalkBuilder::new(&root)
            .hidden(true)               // Skip hidden files
            .git_ignore(respect_ignore)
            .git_global(respect_ignore)
            .git_exclude(respect_ignore)
            .ignore(respect_ignore)
            .parents(respect_ignore)
            .follow_links(false)        // Symlink cycles are never walked
            .overrides(overrides)
            .build();

        let mut files = Vec::new();
        let mut seen = 0usize;

        for entry in walker {
            seen += 1;
            if Instant::now() > deadline {
                return Err(DiscoveryError::Timeout {
                    limit,
                    files_seen: seen,
                });
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    trace!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                continue;
            }

            let path = entry.path();
            let accepted = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| self.config.accepts_extension(e))
                .unwrap_or(false);
            if !accepted {
                continue;
            }

            let Some(dialect) = Dialect::from_path(path) else {
                continue;
            };

            trace!("Found {:?}: {}", dialect, path.display());
            files.push(SourceFile::new(path.to_path_buf(), dialect));
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));

        debug!("Found {} files", files.len());
        Ok(files)
    }

    /// Turn the exclude globs into ignore-only overrides.
    ///
    /// A `dir/**` pattern also excludes `dir` itself so the walker never
    /// descends into it. The backup directory is always excluded.
    fn build_overrides(&self, root: &Path) -> Result<Override, DiscoveryError> {
        let mut builder = OverrideBuilder::new(root);

        for pattern in &self.config.exclude {
            let pattern = pattern.trim_start_matches('!');
            let mut globs = vec![format!("!{}", pattern)];

            if let Some(dir) = pattern.strip_suffix("/**") {
                if !dir.is_empty() && !dir.contains('*') {
                    let anchored = if dir.contains('/') {
                        dir.to_string()
                    } else {
                        format!("/{}", dir)
                    };
                    globs.push(format!("!{}", anchored));
                }
            }

            for glob in globs {
                builder
                    .add(&glob)
                    .map_err(|source| DiscoveryError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })?;
            }
        }

        if let Some(dir) = self.backup_dir_under(root) {
            for glob in [format!("!/{}", dir), format!("!/{}/**", dir)] {
                builder
                    .add(&glob)
                    .map_err(|source| DiscoveryError::InvalidPattern {
                        pattern: dir.clone(),
                        source,
                    })?;
            }
        }

        builder.build().map_err(|source| DiscoveryError::InvalidPattern {
            pattern: self.config.exclude.join(", "),
            source,
        })
    }

    /// The backup directory as a `/`-separated path relative to `root`, if
    /// it lies inside the project
    fn backup_dir_under(&self, root: &Path) -> Option<String> {
        let dir = &self.config.backup_dir;
        let relative = if dir.is_absolute() {
            let dir = dir.canonicalize().unwrap_or_else(|_| dir.clone());
            dir.strip_prefix(root).ok()?.to_path_buf()
        } else {
            dir.clone()
        };

        let parts: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().to_string()),
                _ => None,
            })
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join("/"))
    }
}

/// Statistics about discovered files
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FileStats {
    pub javascript_files: usize,
    pub jsx_files: usize,
    pub typescript_files: usize,
    pub tsx_files: usize,
}

impl FileStats {
    pub fn from_files(files: &[SourceFile]) -> Self {
        let mut stats = Self::default();
        for file in files {
            match file.dialect {
                Dialect::JavaScript => stats.javascript_files += 1,
                Dialect::Jsx => stats.jsx_files += 1,
                Dialect::TypeScript => stats.typescript_files += 1,
                Dialect::Tsx => stats.tsx_files += 1,
            }
        }
        stats
    }

    pub fn total(&self) -> usize {
        self.javascript_files + self.jsx_files + self.typescript_files + self.tsx_files
    }
}
