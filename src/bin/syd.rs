//! syd - Structured YAML Diff CLI tool
//!
//! Compares two YAML files, or two directories of YAML files, and lists
//! the semantic differences.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use serde_json::json;
use structured_yaml_diff::{
    compare_directories, compare_locations, DiffOptions, FileComparison, FileLoader, FileOutcome,
    Report,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Exit status for any fatal error.
const EXIT_FATAL: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One line per difference.
    Human,
    /// A single summary line.
    Brief,
    /// The full report as JSON.
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "syd", version, about = "Semantic diff for YAML files")]
struct Cli {
    /// Original file or directory (`-` for stdin).
    from: String,
    /// Changed file or directory.
    to: String,

    /// YAML file with default options; flags given here override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short = 'O', long, value_enum, default_value_t = OutputFormat::Human)]
    output: OutputFormat,

    /// Exit with status 1 when differences are found.
    #[arg(short, long)]
    set_exit_code: bool,

    /// Log engine decisions to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[arg(short, long)]
    ignore_order_changes: bool,
    #[arg(long)]
    ignore_whitespace_changes: bool,
    #[arg(long)]
    ignore_value_changes: bool,
    #[arg(long)]
    no_detect_kubernetes: bool,
    #[arg(long)]
    no_detect_renames: bool,
    #[arg(long)]
    ignore_api_version: bool,
    #[arg(long)]
    no_cert_inspection: bool,

    /// Identifier field for lists of mappings (repeatable).
    #[arg(long = "additional-identifier")]
    additional_identifiers: Vec<String>,
    /// Only keep differences at or below this path (repeatable).
    #[arg(long = "filter")]
    filter_paths: Vec<String>,
    /// Drop differences at or below this path (repeatable).
    #[arg(long = "exclude")]
    exclude_paths: Vec<String>,
    #[arg(long = "filter-regexp")]
    filter_regexps: Vec<String>,
    #[arg(long = "exclude-regexp")]
    exclude_regexps: Vec<String>,

    #[arg(long)]
    chroot: Option<String>,
    #[arg(long)]
    chroot_of_from: Option<String>,
    #[arg(long)]
    chroot_of_to: Option<String>,
    #[arg(long)]
    chroot_list_to_documents: bool,

    #[arg(long)]
    minor_change_threshold: Option<f64>,
    #[arg(long)]
    rename_similarity_threshold: Option<f64>,
    /// Render paths as `/spec/containers/name=nginx`.
    #[arg(long)]
    use_go_patch_style: bool,
}

impl Cli {
    /// Builds the options: config file first, then flags on top.
    fn options(&self) -> structured_yaml_diff::Result<DiffOptions> {
        let mut options = match &self.config {
            Some(path) => DiffOptions::load(path)?,
            None => DiffOptions::default(),
        };

        options.ignore_order_changes |= self.ignore_order_changes;
        options.ignore_whitespace_changes |= self.ignore_whitespace_changes;
        options.ignore_value_changes |= self.ignore_value_changes;
        options.ignore_api_version |= self.ignore_api_version;
        options.no_cert_inspection |= self.no_cert_inspection;
        options.chroot_list_to_documents |= self.chroot_list_to_documents;
        options.use_go_patch_style |= self.use_go_patch_style;
        if self.no_detect_kubernetes {
            options.detect_kubernetes = false;
        }
        if self.no_detect_renames {
            options.detect_renames = false;
        }

        options.additional_identifiers.extend(self.additional_identifiers.iter().cloned());
        options.filter_paths.extend(self.filter_paths.iter().cloned());
        options.exclude_paths.extend(self.exclude_paths.iter().cloned());
        options.filter_regexps.extend(self.filter_regexps.iter().cloned());
        options.exclude_regexps.extend(self.exclude_regexps.iter().cloned());

        if self.chroot.is_some() {
            options.chroot = self.chroot.clone();
        }
        if self.chroot_of_from.is_some() {
            options.chroot_of_from = self.chroot_of_from.clone();
        }
        if self.chroot_of_to.is_some() {
            options.chroot_of_to = self.chroot_of_to.clone();
        }
        if let Some(threshold) = self.minor_change_threshold {
            options.minor_change_threshold = threshold;
        }
        if let Some(threshold) = self.rename_similarity_threshold {
            options.rename_similarity_threshold = threshold;
        }

        options.validate()?;
        Ok(options)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    match run(&cli) {
        Ok(found) if found && cli.set_exit_code => ExitCode::from(1),
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

/// Runs the comparison and prints it. Returns whether differences exist.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let options = cli.options()?;
    let mut stdout = io::stdout().lock();

    if Path::new(&cli.from).is_dir() && Path::new(&cli.to).is_dir() {
        let results = compare_directories(
            &FileLoader,
            Path::new(&cli.from),
            Path::new(&cli.to),
            &options,
        )?;
        print_files(&mut stdout, &results, cli.output, options.use_go_patch_style)?;
        return Ok(results.iter().any(FileComparison::has_differences));
    }

    let report = compare_locations(&FileLoader, &cli.from, &cli.to, &options)?;
    print_report(&mut stdout, &report, cli.output, options.use_go_patch_style)?;
    Ok(report.has_differences())
}

fn print_report(
    output: &mut dyn Write,
    report: &Report,
    format: OutputFormat,
    go_patch_style: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Human => write!(output, "{}", report.render(go_patch_style))?,
        OutputFormat::Brief => writeln!(output, "{}", report.brief())?,
        OutputFormat::Json => writeln!(output, "{}", serde_json::to_string_pretty(report)?)?,
    }
    Ok(())
}

fn print_files(
    output: &mut dyn Write,
    results: &[FileComparison],
    format: OutputFormat,
    go_patch_style: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if format == OutputFormat::Json {
        let files: Vec<_> = results
            .iter()
            .map(|result| match &result.outcome {
                FileOutcome::Compared(report) => json!({
                    "file": result.relative_path,
                    "report": report,
                }),
                FileOutcome::Skipped(err) => json!({
                    "file": result.relative_path,
                    "error": err.to_string(),
                }),
            })
            .collect();
        writeln!(output, "{}", serde_json::to_string_pretty(&files)?)?;
        return Ok(());
    }

    for result in results {
        match &result.outcome {
            FileOutcome::Compared(report) if report.has_differences() => {
                writeln!(output, "--- {}", result.relative_path.display())?;
                print_report(output, report, format, go_patch_style)?;
            }
            FileOutcome::Compared(_) => {}
            FileOutcome::Skipped(err) => {
                writeln!(output, "--- {} (skipped: {})", result.relative_path.display(), err)?;
            }
        }
    }
    Ok(())
}
