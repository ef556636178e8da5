mod json;
mod terminal;

pub use json::JsonReporter;
pub use terminal::TerminalReporter;

use crate::analysis::Finding;
use miette::Result;
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Terminal,
    Json,
}

/// Reporter for outputting analysis findings
pub struct Reporter {
    format: ReportFormat,
    output_path: Option<PathBuf>,
}

impl Reporter {
    pub fn new(format: ReportFormat, output_path: Option<PathBuf>) -> Self {
        Self { format, output_path }
    }

    /// Report the findings
    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        match self.format {
            ReportFormat::Terminal => TerminalReporter::new().report(findings),
            ReportFormat::Json => JsonReporter::new(self.output_path.clone()).report(findings),
        }
    }
}
