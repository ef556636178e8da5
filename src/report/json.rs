use crate::analysis::Finding;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

/// JSON reporter; the ordered finding array is the machine-readable contract
pub struct JsonReporter {
    output_path: Option<PathBuf>,
}

impl JsonReporter {
    pub fn new(output_path: Option<PathBuf>) -> Self {
        Self { output_path }
    }

    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        let json = render(findings)?;

        if let Some(path) = &self.output_path {
            std::fs::write(path, &json).into_diagnostic()?;
            eprintln!("Report written to: {}", path.display());
        } else {
            println!("{}", json);
        }

        Ok(())
    }
}

pub(crate) fn render(findings: &[Finding]) -> Result<String> {
    serde_json::to_string_pretty(findings).into_diagnostic()
}
