//! CLI entry point for dataset diagnosis and cleaning.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use datamend::{
    CleaningReport, DetectorConfig, DiagnosisReport, FieldValue, FillConfig, FillStrategy,
    IssueDetector, ReportGenerator, ValidationRegistry, io,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// CLI-compatible fill strategy enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFillStrategy {
    /// Mean of the column (numeric columns only)
    Mean,
    /// Median of the column (numeric columns only)
    Median,
    /// Most frequent value
    Mode,
    /// The value given with --custom-value
    Custom,
    /// Carry the previous value forward
    ForwardFill,
    /// Carry the next value backward
    BackwardFill,
}

impl From<CliFillStrategy> for FillStrategy {
    fn from(cli: CliFillStrategy) -> Self {
        match cli {
            CliFillStrategy::Mean => FillStrategy::Mean,
            CliFillStrategy::Median => FillStrategy::Median,
            CliFillStrategy::Mode => FillStrategy::Mode,
            CliFillStrategy::Custom => FillStrategy::Custom,
            CliFillStrategy::ForwardFill => FillStrategy::ForwardFill,
            CliFillStrategy::BackwardFill => FillStrategy::BackwardFill,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Data-quality diagnosis and missing-value repair",
    long_about = "Find missing, invalid, duplicate and outlying values in a CSV file, \
                  then fill the gaps with a chosen strategy.\n\n\
                  EXAMPLES:\n  \
                  # Report issues\n  \
                  datamend diagnose -i students.csv\n\n  \
                  # Fill two numeric columns with their median\n  \
                  datamend clean -i students.csv --strategy median --columns math_score,hours\n\n  \
                  # Use a JSON fill request\n  \
                  datamend clean -i students.csv --config fill.json -o cleaned.csv"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all logs; only the final JSON report is written.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report data-quality issues without changing anything
    Diagnose(DiagnoseArgs),
    /// Fill missing values and write the cleaned dataset
    Clean(CleanArgs),
}

#[derive(Args, Debug)]
struct DiagnoseArgs {
    /// Path to the CSV file to inspect
    #[arg(short, long)]
    input: String,

    /// IQR multiplier for outlier bounds
    #[arg(long, default_value = "3.0")]
    iqr_multiplier: f64,

    /// Values at or above this multiple of the median are set aside before
    /// outlier bounds are computed
    #[arg(long, default_value = "100.0")]
    extreme_ratio: f64,

    /// Also flag weekly_self_study_hours values above 80
    #[arg(long)]
    check_study_hours: bool,

    /// Write a detailed JSON report to this directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct CleanArgs {
    /// Path to the CSV file to clean
    #[arg(short, long)]
    input: String,

    /// Where to write the cleaned CSV
    ///
    /// Defaults to <input_name>_cleaned.csv next to the input
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file holding a fill request; flags below override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fill strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliFillStrategy>,

    /// Columns to fill (comma separated)
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,

    /// Literal used by the custom strategy
    #[arg(long)]
    custom_value: Option<String>,

    /// Drop rows that still have missing fields after filling
    #[arg(long)]
    remove_empty_rows: bool,

    /// Write a detailed JSON report to this directory
    #[arg(short = 'r', long)]
    emit_report: Option<PathBuf>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet, cli.json);

    match &cli.command {
        Command::Diagnose(args) => run_diagnose(args, &cli),
        Command::Clean(args) => run_clean(args, &cli),
    }
}

fn run_diagnose(args: &DiagnoseArgs, cli: &Cli) -> Result<()> {
    let dataset = load_input(&args.input)?;

    let config = DetectorConfig::builder()
        .iqr_multiplier(args.iqr_multiplier)
        .extreme_ratio(args.extreme_ratio)
        .build()?;
    let mut detector = IssueDetector::new(config);
    if args.check_study_hours {
        detector = detector.with_registry(ValidationRegistry::default().with_study_hours_limit());
    }
    let issues = detector.detect(&dataset)?;
    let report = ReportGenerator::build_diagnosis_report(&args.input, &dataset, &issues);

    if let Some(dir) = &args.emit_report {
        ReportGenerator::new(dir.clone()).write_report_to_file(&report, &input_stem(&args.input))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_diagnosis_summary(&report);
    }
    Ok(())
}

fn run_clean(args: &CleanArgs, cli: &Cli) -> Result<()> {
    let dataset = load_input(&args.input)?;
    let config = resolve_fill_config(args)?;
    debug!("Fill request: {:?}", config);

    let cleaned = datamend::clean(&dataset, &config)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    io::write_csv(&cleaned.dataset, &output)?;

    let output_display = output.display().to_string();
    let report = ReportGenerator::build_cleaning_report(
        &args.input,
        Some(&output_display),
        &dataset,
        config.strategy,
        &cleaned,
    );

    if let Some(dir) = &args.emit_report {
        ReportGenerator::new(dir.clone()).write_report_to_file(&report, &input_stem(&args.input))?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if !cli.quiet {
        print_cleaning_summary(&report);
    }
    Ok(())
}

fn load_input(input: &str) -> Result<datamend::Dataset> {
    if !Path::new(input).exists() {
        return Err(anyhow!("Input file not found: {}", input));
    }
    info!("Loading dataset from: {}", input);
    Ok(io::load_csv(input)?)
}

/// Merge the optional JSON request with command-line overrides.
fn resolve_fill_config(args: &CleanArgs) -> Result<FillConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Reading fill config {}", path.display()))?;
            serde_json::from_str::<FillConfig>(&raw)
                .with_context(|| format!("Parsing fill config {}", path.display()))?
        }
        None => FillConfig {
            strategy: FillStrategy::default(),
            columns: Vec::new(),
            custom_value: None,
            remove_empty_rows: false,
        },
    };

    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if !args.columns.is_empty() {
        config.columns = args.columns.clone();
    }
    if let Some(value) = &args.custom_value {
        config.custom_value = Some(FieldValue::from(value.as_str()));
    }
    if args.remove_empty_rows {
        config.remove_empty_rows = true;
    }

    config.validate()?;
    Ok(config)
}

fn input_stem(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string())
}

fn default_output_path(input: &str) -> PathBuf {
    let name = format!("{}_cleaned.csv", input_stem(input));
    match Path::new(input).parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}

/// Print a human-readable diagnosis.
///
/// Uses `println!` intentionally: this is the command's primary output and
/// must show regardless of log level.
fn print_diagnosis_summary(report: &DiagnosisReport) {
    let counts = &report.counts;

    println!();
    println!("{}", "=".repeat(80));
    println!("DIAGNOSIS COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!(
        "Input: {} ({} rows x {} columns)",
        report.input_file, report.shape.rows, report.shape.columns
    );
    println!();

    println!("Columns With Gaps:");
    if report.classification.is_empty() {
        println!("  none");
    } else {
        println!("  numeric:     {}", report.classification.numeric.join(", "));
        println!("  categorical: {}", report.classification.categorical.join(", "));
    }
    println!();

    println!("Issues:");
    println!("  Missing values: {}", counts.missing_values);
    println!("  Invalid values: {}", counts.invalid_values);
    println!(
        "  Duplicates:     {} groups ({} repeated rows)",
        counts.duplicate_groups, counts.duplicate_rows
    );
    println!("  Outliers:       {}", counts.outliers);
    println!();

    let issues = &report.issues;
    for row in issues.missing_by_row().iter().take(5) {
        println!("  - row {}: missing {}", row.row, row.columns.join(", "));
    }
    for invalid in issues.invalid_values.iter().take(5) {
        println!(
            "  - row {}: '{}' = '{}' fails {}",
            invalid.row, invalid.column, invalid.value, invalid.rule
        );
    }
    for group in issues.duplicates.iter().take(5) {
        let rows: Vec<String> = group.rows.iter().map(|r| r.to_string()).collect();
        println!("  - rows {} are identical", rows.join(", "));
    }
    for outlier in issues.outliers.iter().take(5) {
        println!(
            "  - row {}: '{}' = {} is an outlier",
            outlier.row, outlier.column, outlier.value
        );
    }
    if counts.total > 20 {
        println!("  ... use --json for the full list");
    }

    if !issues.scan_failures.is_empty() {
        println!();
        println!("Warnings:");
        for failure in &issues.scan_failures {
            println!("  ! {} scan failed: {}", failure.scan, failure.message);
        }
    }

    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}

/// Print a human-readable summary of a cleaning run.
fn print_cleaning_summary(report: &CleaningReport) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();
    println!("Input:  {} ({} rows)", report.input_file, summary.rows_before);
    if let Some(ref output_file) = report.output_file {
        println!("Output: {} ({} rows)", output_file, summary.rows_after);
    }
    println!();

    println!("Processing Summary:");
    println!("  Strategy: {}", summary.strategy);
    println!(
        "  Cells filled: {} across {} column(s)",
        summary.cells_filled, summary.columns_filled
    );
    println!("  Rows removed: {}", summary.rows_removed);
    println!("  Cells still missing: {}", summary.cells_still_missing);
    println!();

    if !report.processing_steps.is_empty() {
        println!("Actions Taken:");
        for step in report.processing_steps.iter().take(10) {
            println!("  - {}", step);
        }
        if report.processing_steps.len() > 10 {
            println!(
                "  ... and {} more actions",
                report.processing_steps.len() - 10
            );
        }
        println!();
    }

    if !report.failures.is_empty() {
        println!("Warnings:");
        for failure in &report.failures {
            println!("  ! {}: {}", failure.column, failure.message);
        }
        println!();
    }

    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(80));
}
