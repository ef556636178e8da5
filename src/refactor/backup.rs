use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Writes backups into a single directory, created on first use.
///
/// Whole files keep their base name; line-range snippets are named
/// `<basename>.backup_<millis>.txt`. Existing backups are never overwritten.
#[derive(Debug, Clone)]
pub struct BackupStore {
    dir: PathBuf,
}

impl BackupStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Copy `path` verbatim into the store
    pub fn backup_file(&self, path: &Path) -> io::Result<PathBuf> {
        self.ensure_dir()?;
        let base = base_name(path);

        let mut target = self.dir.join(&base);
        if target.exists() {
            target = self.unique(&format!("{}.{}", base, millis_now()), "");
        }

        std::fs::copy(path, &target)?;
        debug!("Backed up {} to {}", path.display(), target.display());
        Ok(target)
    }

    /// Write a removed snippet of `path` into the store
    pub fn backup_snippet(&self, path: &Path, text: &str) -> io::Result<PathBuf> {
        self.ensure_dir()?;
        let stem = format!("{}.backup_{}", base_name(path), millis_now());
        let target = self.unique(&stem, ".txt");

        std::fs::write(&target, text)?;
        debug!("Backed up snippet of {} to {}", path.display(), target.display());
        Ok(target)
    }

    fn ensure_dir(&self) -> io::Result<()> {
        if !self.dir.is_dir() {
            std::fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// First free `<stem><suffix>`, then `<stem>_1<suffix>`, `<stem>_2<suffix>`...
    fn unique(&self, stem: &str, suffix: &str) -> PathBuf {
        let first = self.dir.join(format!("{}{}", stem, suffix));
        if !first.exists() {
            return first;
        }
        (1..)
            .map(|n| self.dir.join(format!("{}_{}{}", stem, n, suffix)))
            .find(|candidate| !candidate.exists())
            .unwrap_or(first)
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "unnamed".to_string())
}

fn millis_now() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
