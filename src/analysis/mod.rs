// Analysis pipeline: unused files, unused components, unused utilities

mod analyzer;
mod cancel;
mod finding;
mod unused_declarations;
mod unused_files;
mod usage;

pub use analyzer::{AnalysisError, AnalysisReport, Analyzer};
pub use cancel::CancellationToken;
pub use finding::{Finding, FindingCounts, FindingKind};
pub use unused_declarations::{find_unused_components, find_unused_utilities};
pub use unused_files::find_unused_files;
pub use usage::{FileUsage, UsageExtractor};
