use super::DeletionError;
use std::path::{Path, PathBuf};

/// Line-oriented view of one file on disk.
///
/// Lines are split on `\n` only and re-joined the same way, so a trailing
/// newline and any `\r` survive an edit untouched.
pub struct FileEditor {
    path: PathBuf,
    lines: Vec<String>,
}

impl FileEditor {
    pub fn open(path: &Path) -> Result<Self, DeletionError> {
        if !path.is_file() {
            return Err(DeletionError::TargetMissing {
                path: path.to_path_buf(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::from_contents(path, &contents))
    }

    pub fn from_contents(path: &Path, contents: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: contents.split('\n').map(str::to_string).collect(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of the 1-based inclusive range, joined by `\n`
    pub fn slice(&self, start_line: usize, end_line: usize) -> Result<String, DeletionError> {
        self.check_range(start_line, end_line)?;
        Ok(self.lines[start_line - 1..end_line].join("\n"))
    }

    /// Remove the 1-based inclusive range and return the removed text
    pub fn remove_lines(&mut self, start_line: usize, end_line: usize) -> Result<String, DeletionError> {
        self.check_range(start_line, end_line)?;
        let removed: Vec<String> = self.lines.drain(start_line - 1..end_line).collect();
        Ok(removed.join("\n"))
    }

    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    pub fn save(&self) -> Result<(), DeletionError> {
        std::fs::write(&self.path, self.contents())?;
        Ok(())
    }

    fn check_range(&self, start_line: usize, end_line: usize) -> Result<(), DeletionError> {
        let line_count = self.line_count();
        if start_line == 0 || start_line > end_line || end_line > line_count {
            return Err(DeletionError::InvalidRange {
                start_line,
                end_line,
                line_count,
            });
        }
        Ok(())
    }
}
