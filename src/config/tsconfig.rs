use ignore::overrides::{Override, OverrideBuilder};
use ignore::Match;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// The files `tsconfig.json` admits into the compiler project.
///
/// Script files are always part of the project, whatever `allowJs` says.
/// Admission only scopes component/utility analysis; every collected file
/// still contributes imports and is still checked for being unused.
#[derive(Debug, Clone, Default)]
pub struct ProjectScope {
    /// Explicit `files` entries, joined to the project root
    files: Vec<PathBuf>,
    /// `include` globs; `None` admits everything
    include: Option<Override>,
    exclude: Option<Override>,
}

#[derive(Debug, Default, Deserialize)]
struct TsConfigFile {
    #[serde(default)]
    files: Option<Vec<String>>,
    #[serde(default)]
    include: Option<Vec<String>>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

/// Errors reading the project scope out of `tsconfig.json`
#[derive(Error, Debug)]
pub enum TsConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("Invalid tsconfig pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: ignore::Error,
    },
}

impl ProjectScope {
    /// Load `tsconfig.json` from the project root.
    ///
    /// A missing file admits everything. A file that cannot be read or is
    /// not plain JSON is logged and also admits everything.
    pub fn load(project_root: &Path) -> Self {
        let path = project_root.join("tsconfig.json");
        if !path.exists() {
            debug!("No tsconfig.json at {}, analysing every file", path.display());
            return Self::default();
        }

        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };

        // Matching strips the root prefix, so it must look like the
        // canonical paths discovery hands out
        let root = project_root
            .canonicalize()
            .unwrap_or_else(|_| project_root.to_path_buf());

        Self::parse(&root, &contents).unwrap_or_else(|e| {
            warn!("Ignoring unusable {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn parse(root: &Path, contents: &str) -> Result<Self, TsConfigError> {
        let file: TsConfigFile = serde_json::from_str(contents)?;

        let files: Vec<PathBuf> = file
            .files
            .unwrap_or_default()
            .iter()
            .map(|f| root.join(f.trim_start_matches("./")))
            .collect();

        // With `files` given and no `include`, nothing else is admitted
        let include = match file.include {
            Some(patterns) => Some(matcher(root, &patterns)?),
            None if !files.is_empty() => Some(matcher(root, &[])?),
            None => None,
        };
        let exclude = match file.exclude {
            Some(patterns) if !patterns.is_empty() => Some(matcher(root, &patterns)?),
            _ => None,
        };

        Ok(Self {
            files,
            include,
            exclude,
        })
    }

    /// Whether `path` belongs to the compiler project. Explicit `files`
    /// entries win over `exclude`.
    pub fn admits(&self, path: &Path) -> bool {
        if self.files.iter().any(|f| f == path) {
            return true;
        }

        let included = self
            .include
            .as_ref()
            .map(|include| matches!(include.matched(path, false), Match::Whitelist(_)))
            .unwrap_or(true);
        let excluded = self
            .exclude
            .as_ref()
            .map(|exclude| matches!(exclude.matched(path, false), Match::Whitelist(_)))
            .unwrap_or(false);

        included && !excluded
    }
}

/// Root-anchored matcher for tsconfig patterns. A pattern naming a
/// directory covers everything below it.
fn matcher(root: &Path, patterns: &[String]) -> Result<Override, TsConfigError> {
    let mut builder = OverrideBuilder::new(root);
    let mut add = |glob: String, pattern: &str| {
        builder
            .add(&glob)
            .map(|_| ())
            .map_err(|source| TsConfigError::Pattern {
                pattern: pattern.to_string(),
                source,
            })
    };

    for pattern in patterns {
        let trimmed = pattern.trim_start_matches("./").trim_end_matches('/');
        if trimmed.is_empty() || trimmed == "." {
            add("/**".to_string(), pattern)?;
            continue;
        }
        add(format!("/{}", trimmed), pattern)?;
        add(format!("/{}/**", trimmed), pattern)?;
    }

    builder.build().map_err(|source| TsConfigError::Pattern {
        pattern: patterns.join(", "),
        source,
    })
}
