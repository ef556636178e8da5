// Deletion engine: whole files and line ranges, with optional backups

mod backup;
mod deleter;
mod editor;
mod safe_delete;

pub use backup::BackupStore;
pub use deleter::{
    BatchResult, Deleter, DeletionBatch, DeletionError, DeletionFailure, DeletionOutcome,
    DeletionRequest,
};
pub use editor::FileEditor;
pub use safe_delete::SafeDeleter;
