use super::deleter::{BatchResult, Deleter, DeletionRequest};
use crate::analysis::Finding;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};
use miette::{IntoDiagnostic, Result};

/// Interactive deletion of findings with user confirmation
pub struct SafeDeleter {
    deleter: Deleter,
    backup: bool,
    dry_run: bool,
}

impl SafeDeleter {
    pub fn new(deleter: Deleter, backup: bool, dry_run: bool) -> Self {
        Self {
            deleter: deleter.with_dry_run(dry_run),
            backup,
            dry_run,
        }
    }

    /// Let the user pick findings, then delete them
    pub fn delete(&self, findings: &[Finding]) -> Result<BatchResult> {
        if findings.is_empty() {
            println!("{}", "No dead code to delete.".green());
            return Ok(BatchResult::default());
        }

        // In dry-run mode, skip selection and show all candidates
        if self.dry_run {
            println!();
            println!("{}", "Dry run - would delete:".yellow().bold());
            for finding in findings {
                println!("  {}", describe(finding));
            }
            println!();
            println!(
                "{}",
                format!("Total: {} items would be deleted", findings.len()).dimmed()
            );
            let requests: Vec<DeletionRequest> = findings.iter().map(DeletionRequest::from).collect();
            return Ok(self.deleter.apply(&requests, self.backup));
        }

        let selected = self.select(findings)?;
        if selected.is_empty() {
            println!("{}", "No items selected for deletion.".yellow());
            return Ok(BatchResult::default());
        }

        println!();
        println!("{}", "Deleting dead code...".cyan().bold());

        let requests: Vec<DeletionRequest> = selected.iter().map(|f| DeletionRequest::from(*f)).collect();
        let result = self.deleter.apply(&requests, self.backup);
        print_result(&result);

        if self.backup && !result.deleted.is_empty() {
            println!();
            println!(
                "{} Backups saved to: {}",
                "→".dimmed(),
                self.deleter.backup_dir().display()
            );
        }

        Ok(result)
    }

    /// Batch selection - pick multiple at once, then confirm
    fn select<'a>(&self, findings: &'a [Finding]) -> Result<Vec<&'a Finding>> {
        let items: Vec<String> = findings.iter().map(describe).collect();

        println!();
        println!("{}", "Select items to delete:".cyan().bold());
        println!("{}", "(Space to toggle, Enter to confirm)".dimmed());
        println!();

        let selections = MultiSelect::with_theme(&ColorfulTheme::default())
            .items(&items)
            .interact()
            .into_diagnostic()?;

        let selected: Vec<&Finding> = selections.into_iter().map(|i| &findings[i]).collect();

        // Confirm final selection
        if !selected.is_empty() {
            println!();
            let confirm = Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("Delete {} items?", selected.len()))
                .default(false)
                .interact()
                .into_diagnostic()?;

            if !confirm {
                return Ok(Vec::new());
            }
        }

        Ok(selected)
    }
}

fn print_result(result: &BatchResult) {
    for outcome in &result.deleted {
        let request = &outcome.request;
        println!(
            "  {} Deleted {} {}",
            "✓".green(),
            request.kind.display_name(),
            request
                .name
                .as_deref()
                .map(|n| format!("'{}'", n))
                .unwrap_or_else(|| request.path.display().to_string())
        );
    }
    for failure in &result.failed {
        println!(
            "  {} Failed to delete {} {}: {}",
            "✗".red(),
            failure.request.kind.display_name(),
            failure.request.path.display(),
            failure.error
        );
    }
}

fn describe(finding: &Finding) -> String {
    match (finding.name(), finding.line_range()) {
        (Some(name), Some((start, end))) => format!(
            "{} '{}' at {}:{}-{}",
            finding.kind().display_name(),
            name,
            finding.path().display(),
            start,
            end
        ),
        _ => format!("{} {}", finding.kind().display_name(), finding.path().display()),
    }
}
