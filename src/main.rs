use clap::Parser;
use colored::Colorize;
use deadsweep::analysis::{AnalysisReport, Analyzer};
use deadsweep::config::Config;
use deadsweep::refactor::{Deleter, DeletionBatch, SafeDeleter};
use deadsweep::report::{ReportFormat, Reporter};
use miette::{IntoDiagnostic, Result, WrapErr};
use std::path::{Path, PathBuf};
use tracing::info;

/// deadsweep - Find and remove unused files, components and utilities
#[derive(Parser, Debug)]
#[command(name = "deadsweep")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the project directory to analyze
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Patterns to exclude (can be specified multiple times)
    #[arg(short, long)]
    exclude: Vec<String>,

    /// File discovery timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: OutputFormat,

    /// Output file (for json format)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Analyze files one at a time
    #[arg(long)]
    no_parallel: bool,

    /// Select findings to delete after analysis
    #[arg(long)]
    delete: bool,

    /// Back up deleted files and line ranges
    #[arg(long)]
    backup: bool,

    /// Dry run - show what would be deleted without making changes
    #[arg(long)]
    dry_run: bool,

    /// Apply a deletion batch (JSON) instead of analyzing
    #[arg(long, value_name = "FILE")]
    apply: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode - only output results
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug, Default)]
enum OutputFormat {
    #[default]
    Terminal,
    Json,
}

impl From<OutputFormat> for ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => ReportFormat::Terminal,
            OutputFormat::Json => ReportFormat::Json,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose, cli.quiet);

    info!("deadsweep v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config(&cli)?;

    if let Some(batch_path) = &cli.apply {
        return run_apply(&config, &cli, batch_path);
    }

    run_analysis(&config, &cli)
}

fn init_logging(verbose: bool, quiet: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    // Logs go to stderr so JSON on stdout stays parseable
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)?
    } else {
        // Try to load from default locations
        Config::from_default_locations(&cli.path)?
    };

    // Override with CLI arguments
    if !cli.exclude.is_empty() {
        config.exclude.extend(cli.exclude.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.discovery_timeout_secs = timeout;
    }
    if cli.no_parallel {
        config.parallel = false;
    }

    Ok(config)
}

fn run_analysis(config: &Config, cli: &Cli) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};
    use std::time::Duration;

    let show_progress = matches!(cli.format, OutputFormat::Terminal) && !cli.quiet;
    let spinner = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Analyzing...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = Analyzer::new(config, &cli.path).run();
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }
    let report: AnalysisReport = result
        .into_diagnostic()
        .wrap_err_with(|| format!("Analysis of {} failed", cli.path.display()))?;

    if show_progress {
        println!(
            "{}",
            format!("Analyzed {} files", report.files_analyzed).dimmed()
        );
        if !report.parse_failures.is_empty() {
            println!(
                "{}",
                format!(
                    "{} files had syntax errors and were only checked for imports",
                    report.parse_failures.len()
                )
                .yellow()
            );
        }
    }

    let reporter = Reporter::new(cli.format.clone().into(), cli.output.clone());
    reporter.report(&report.findings)?;

    if cli.delete && !report.findings.is_empty() {
        let deleter = Deleter::new(&cli.path, &config.backup_dir);
        let result = SafeDeleter::new(deleter, cli.backup, cli.dry_run).delete(&report.findings)?;
        if !result.is_success() {
            return Err(miette::miette!("{} deletions failed", result.failed.len()));
        }
    }

    Ok(())
}

fn run_apply(config: &Config, cli: &Cli, batch_path: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(batch_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read deletion batch: {}", batch_path.display()))?;
    let batch: DeletionBatch = serde_json::from_str(&contents)
        .into_diagnostic()
        .wrap_err("Failed to parse deletion batch")?;

    let deleter = Deleter::new(&cli.path, &config.backup_dir).with_dry_run(cli.dry_run);
    let backup = batch.backup_enabled || cli.backup;
    let result = deleter.apply(&batch.items, backup);

    println!("{}", serde_json::to_string_pretty(&result).into_diagnostic()?);

    if !result.is_success() {
        return Err(miette::miette!("{} of {} deletions failed", result.failed.len(), batch.items.len()));
    }
    Ok(())
}
