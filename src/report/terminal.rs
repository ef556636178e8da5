use crate::analysis::{Finding, FindingCounts, FindingKind};
use colored::Colorize;
use miette::Result;
use std::path::Path;

/// Terminal reporter with colored output, grouped by category then file
pub struct TerminalReporter;

impl TerminalReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, findings: &[Finding]) -> Result<()> {
        if findings.is_empty() {
            println!("{}", "No dead code found!".green().bold());
            return Ok(());
        }

        println!();
        println!(
            "{}",
            format!("Found {} dead code issues:", findings.len())
                .yellow()
                .bold()
        );
        println!();

        for kind in [
            FindingKind::UnusedFile,
            FindingKind::UnusedComponent,
            FindingKind::UnusedUtility,
        ] {
            let items: Vec<&Finding> = findings.iter().filter(|f| f.kind() == kind).collect();
            if !items.is_empty() {
                self.print_section(kind, &items);
            }
        }

        self.print_summary(findings);
        Ok(())
    }

    fn print_section(&self, kind: FindingKind, items: &[&Finding]) {
        let title = match kind {
            FindingKind::UnusedFile => "Unused files",
            FindingKind::UnusedComponent => "Unused components",
            FindingKind::UnusedUtility => "Unused utilities",
        };
        println!("{} ({})", title.magenta().bold(), items.len());

        // Findings are already ordered by file; print a header on each change
        let mut current: Option<&Path> = None;
        for item in items {
            if kind == FindingKind::UnusedFile {
                println!("  {}", item.path().display().to_string().cyan());
                continue;
            }
            if current != Some(item.path()) {
                current = Some(item.path());
                println!("  {}", item.path().display().to_string().cyan().bold());
            }
            self.print_item(item);
        }
        println!();
    }

    fn print_item(&self, item: &Finding) {
        let location = item
            .line_range()
            .map(|(start, end)| format!("{}-{}", start, end))
            .unwrap_or_default();

        println!(
            "    {} {} '{}'",
            location.dimmed(),
            item.kind().display_name().dimmed(),
            item.name().unwrap_or_default().white()
        );
    }

    fn print_summary(&self, findings: &[Finding]) {
        let counts = FindingCounts::from_findings(findings);
        println!("{}", "─".repeat(60).dimmed());
        println!("Summary: {}", counts.to_string().yellow());
    }
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}
