mod file_finder;

pub use file_finder::{Dialect, DiscoveryError, FileFinder, FileStats, SourceFile};
