use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Category of a finding; also the `type` tag of a deletion request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    UnusedFile,
    UnusedComponent,
    UnusedUtility,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::UnusedFile => "unused_file",
            FindingKind::UnusedComponent => "unused_component",
            FindingKind::UnusedUtility => "unused_utility",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FindingKind::UnusedFile => "file",
            FindingKind::UnusedComponent => "component",
            FindingKind::UnusedUtility => "utility",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reported unused item.
///
/// Serialized as a tagged union (`"type": "unused_file"` etc.), the shape
/// consumed by results viewers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Finding {
    UnusedFile {
        path: PathBuf,
        content: String,
    },
    #[serde(rename_all = "camelCase")]
    UnusedComponent {
        file_path: PathBuf,
        name: String,
        code: String,
        start_line: usize,
        end_line: usize,
    },
    #[serde(rename_all = "camelCase")]
    UnusedUtility {
        file_path: PathBuf,
        name: String,
        code: String,
        start_line: usize,
        end_line: usize,
    },
}

impl Finding {
    pub fn kind(&self) -> FindingKind {
        match self {
            Finding::UnusedFile { .. } => FindingKind::UnusedFile,
            Finding::UnusedComponent { .. } => FindingKind::UnusedComponent,
            Finding::UnusedUtility { .. } => FindingKind::UnusedUtility,
        }
    }

    /// The file the finding lives in
    pub fn path(&self) -> &Path {
        match self {
            Finding::UnusedFile { path, .. } => path,
            Finding::UnusedComponent { file_path, .. } | Finding::UnusedUtility { file_path, .. } => {
                file_path
            }
        }
    }

    /// Declaration name, for component and utility findings
    pub fn name(&self) -> Option<&str> {
        match self {
            Finding::UnusedFile { .. } => None,
            Finding::UnusedComponent { name, .. } | Finding::UnusedUtility { name, .. } => Some(name),
        }
    }

    /// 1-based inclusive line range, for component and utility findings
    pub fn line_range(&self) -> Option<(usize, usize)> {
        match self {
            Finding::UnusedFile { .. } => None,
            Finding::UnusedComponent { start_line, end_line, .. }
            | Finding::UnusedUtility { start_line, end_line, .. } => Some((*start_line, *end_line)),
        }
    }

    /// Source text the finding covers
    pub fn code(&self) -> &str {
        match self {
            Finding::UnusedFile { content, .. } => content,
            Finding::UnusedComponent { code, .. } | Finding::UnusedUtility { code, .. } => code,
        }
    }
}

/// Per-category counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FindingCounts {
    pub files: usize,
    pub components: usize,
    pub utilities: usize,
}

impl FindingCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = Self::default();
        for finding in findings {
            match finding.kind() {
                FindingKind::UnusedFile => counts.files += 1,
                FindingKind::UnusedComponent => counts.components += 1,
                FindingKind::UnusedUtility => counts.utilities += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.files + self.components + self.utilities
    }
}

impl std::fmt::Display for FindingCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} unused files, {} unused components, {} unused utilities",
            self.files, self.components, self.utilities
        )
    }
}
