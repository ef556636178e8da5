use super::backup::BackupStore;
use super::editor::FileEditor;
use crate::analysis::{Finding, FindingKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Per-item deletion errors; none of them aborts a batch
#[derive(Error, Debug)]
pub enum DeletionError {
    #[error("Target no longer exists: {path}")]
    TargetMissing { path: PathBuf },

    #[error("Invalid line range {start_line}-{end_line} (file has {line_count} lines)")]
    InvalidRange {
        start_line: usize,
        end_line: usize,
        line_count: usize,
    },

    #[error("Declaration '{name}' is no longer within lines {start_line}-{end_line}")]
    DeclarationMoved {
        name: String,
        start_line: usize,
        end_line: usize,
    },

    #[error("Lines {start_line}-{end_line} overlap another deletion in the same batch")]
    OverlappingRange { start_line: usize, end_line: usize },

    #[error("File {path} is deleted by the same batch")]
    SupersededByFileDeletion { path: PathBuf },

    #[error("Request for {path} has no line range")]
    MissingRange { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A finding's identity, echoed back by whoever selected it for deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionRequest {
    #[serde(rename = "type")]
    pub kind: FindingKind,
    #[serde(alias = "filePath")]
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Finding> for DeletionRequest {
    fn from(finding: &Finding) -> Self {
        let range = finding.line_range();
        Self {
            kind: finding.kind(),
            path: finding.path().to_path_buf(),
            start_line: range.map(|(start, _)| start),
            end_line: range.map(|(_, end)| end),
            name: finding.name().map(str::to_string),
        }
    }
}

/// One batch message: the selected items plus the backup flag
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionBatch {
    pub items: Vec<DeletionRequest>,
    #[serde(default)]
    pub backup_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionOutcome {
    pub request: DeletionRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionFailure {
    pub request: DeletionRequest,
    pub error: String,
}

/// Outcome of every item in a batch
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchResult {
    pub deleted: Vec<DeletionOutcome>,
    pub failed: Vec<DeletionFailure>,
}

impl BatchResult {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn success(&mut self, request: &DeletionRequest, backup_path: Option<PathBuf>) {
        self.deleted.push(DeletionOutcome {
            request: request.clone(),
            backup_path,
        });
    }

    fn failure(&mut self, request: &DeletionRequest, error: DeletionError) {
        warn!("Failed to delete {}: {}", describe(request), error);
        self.failed.push(DeletionFailure {
            request: request.clone(),
            error: error.to_string(),
        });
    }
}

/// Applies deletion batches against the file system, strictly sequentially
pub struct Deleter {
    root: PathBuf,
    backups: BackupStore,
    dry_run: bool,
}

impl Deleter {
    /// `backup_dir` is taken relative to `root` unless absolute
    pub fn new(root: impl Into<PathBuf>, backup_dir: impl AsRef<Path>) -> Self {
        let root = root.into();
        let backups = BackupStore::new(root.join(backup_dir.as_ref()));
        Self {
            root,
            backups,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn backup_dir(&self) -> &Path {
        self.backups.dir()
    }

    /// Apply every request, capturing each item's outcome.
    ///
    /// Requests are grouped by file in first-appearance order. Within a file,
    /// ranges are removed highest start line first so lower ranges stay valid.
    pub fn apply(&self, requests: &[DeletionRequest], backup: bool) -> BatchResult {
        let mut result = BatchResult::default();

        for (path, group) in self.group_by_file(requests) {
            let (whole, ranges): (Vec<_>, Vec<_>) = group
                .into_iter()
                .partition(|r| r.kind == FindingKind::UnusedFile);

            if whole.is_empty() {
                self.apply_ranges(&path, ranges, backup, &mut result);
                continue;
            }

            for (i, request) in whole.into_iter().enumerate() {
                if i > 0 {
                    result.failure(request, DeletionError::TargetMissing { path: path.clone() });
                    continue;
                }
                match self.delete_file(&path, backup) {
                    Ok(backup_path) => result.success(request, backup_path),
                    Err(e) => result.failure(request, e),
                }
            }
            for request in ranges {
                result.failure(
                    request,
                    DeletionError::SupersededByFileDeletion { path: path.clone() },
                );
            }
        }

        info!(
            "Deletion batch complete: {} deleted, {} failed{}",
            result.deleted.len(),
            result.failed.len(),
            if self.dry_run { " (dry run)" } else { "" }
        );
        result
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    fn group_by_file<'r>(&self, requests: &'r [DeletionRequest]) -> Vec<(PathBuf, Vec<&'r DeletionRequest>)> {
        let mut groups: Vec<(PathBuf, Vec<&DeletionRequest>)> = Vec::new();
        for request in requests {
            let path = self.resolve(&request.path);
            match groups.iter_mut().find(|(p, _)| *p == path) {
                Some((_, group)) => group.push(request),
                None => groups.push((path, vec![request])),
            }
        }
        groups
    }

    fn delete_file(&self, path: &Path, backup: bool) -> Result<Option<PathBuf>, DeletionError> {
        if !path.is_file() {
            return Err(DeletionError::TargetMissing {
                path: path.to_path_buf(),
            });
        }
        if self.dry_run {
            debug!("Would delete file {}", path.display());
            return Ok(None);
        }

        let backup_path = if backup {
            Some(self.backups.backup_file(path)?)
        } else {
            None
        };
        std::fs::remove_file(path)?;
        debug!("Deleted file {}", path.display());
        Ok(backup_path)
    }

    fn apply_ranges(
        &self,
        path: &Path,
        mut ranges: Vec<&DeletionRequest>,
        backup: bool,
        result: &mut BatchResult,
    ) {
        let mut editor = match FileEditor::open(path) {
            Ok(editor) => editor,
            Err(e) => {
                let message = e.to_string();
                for request in ranges {
                    result.failed.push(DeletionFailure {
                        request: request.clone(),
                        error: message.clone(),
                    });
                }
                warn!("Cannot edit {}: {}", path.display(), message);
                return;
            }
        };

        // Highest start line first; requests without a range sort last
        ranges.sort_by(|a, b| b.start_line.cmp(&a.start_line));

        let mut accepted: Vec<(usize, usize)> = Vec::new();
        for request in ranges {
            let (Some(start_line), Some(end_line)) = (request.start_line, request.end_line) else {
                result.failure(
                    request,
                    DeletionError::MissingRange {
                        path: path.to_path_buf(),
                    },
                );
                continue;
            };

            if accepted
                .iter()
                .any(|&(s, e)| start_line <= e && s <= end_line)
            {
                result.failure(request, DeletionError::OverlappingRange { start_line, end_line });
                continue;
            }

            match self.remove_range(&mut editor, request, start_line, end_line, backup) {
                Ok(backup_path) => {
                    accepted.push((start_line, end_line));
                    result.success(request, backup_path);
                }
                Err(e) => result.failure(request, e),
            }
        }
    }

    fn remove_range(
        &self,
        editor: &mut FileEditor,
        request: &DeletionRequest,
        start_line: usize,
        end_line: usize,
        backup: bool,
    ) -> Result<Option<PathBuf>, DeletionError> {
        let text = editor.slice(start_line, end_line)?;
        if let Some(name) = &request.name {
            if !text.contains(name.as_str()) {
                return Err(DeletionError::DeclarationMoved {
                    name: name.clone(),
                    start_line,
                    end_line,
                });
            }
        }

        if self.dry_run {
            debug!(
                "Would remove lines {}-{} from {}",
                start_line,
                end_line,
                editor.path().display()
            );
            return Ok(None);
        }

        let backup_path = if backup {
            Some(self.backups.backup_snippet(editor.path(), &text)?)
        } else {
            None
        };
        editor.remove_lines(start_line, end_line)?;
        editor.save()?;
        debug!(
            "Removed lines {}-{} from {}",
            start_line,
            end_line,
            editor.path().display()
        );
        Ok(backup_path)
    }
}

fn describe(request: &DeletionRequest) -> String {
    match (&request.name, request.start_line, request.end_line) {
        (Some(name), Some(start), Some(end)) => {
            format!("{} '{}' at {}:{}-{}", request.kind.display_name(), name, request.path.display(), start, end)
        }
        _ => format!("{} {}", request.kind.display_name(), request.path.display()),
    }
}
