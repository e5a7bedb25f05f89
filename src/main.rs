//! csv-quality CLI - CSV data-quality profiler

use clap::{Args, Parser, Subcommand};
use csv_quality::{
    Config, Delimiter, JsonReporter, LoadDate, MarkdownReporter, ProfileError, Profiler,
    Reporter, Stager, SummaryReporter, discover_files, write_artifacts,
};
use csv_quality::report::{PROFILE_DOCUMENT, QUALITY_REPORT};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// CSV data-quality profiler.
///
/// Profiles every dataset in a directory, scores its quality from 0 to 100
/// and writes a JSON profile document plus a Markdown report.
#[derive(Parser, Debug)]
#[command(name = "csv-quality")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: ./csv-quality.toml if present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG applies otherwise
    #[arg(short = 'v', long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Profile datasets and write the quality artifacts
    Profile(ProfileArgs),
    /// Copy raw datasets and reports into a Hive-partitioned staging tree
    Stage(StageArgs),
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Expected dataset file names (default: every *.csv in the input directory)
    files: Vec<String>,

    /// Directory holding the raw CSV files
    #[arg(short = 'i', long)]
    input_dir: Option<PathBuf>,

    /// Directory receiving data_profile.json and DATA_QUALITY_REPORT.md
    #[arg(short = 'o', long)]
    reports_dir: Option<PathBuf>,

    /// Field delimiter: 'auto', 'tab' or a single character
    #[arg(short = 'd', long, value_parser = parse_delimiter)]
    delimiter: Option<Delimiter>,

    /// Null marker (repeatable; replaces the default list)
    #[arg(long = "null-value")]
    null_values: Vec<String>,

    /// Keep empty fields as empty strings instead of nulls
    #[arg(long)]
    keep_empty: bool,

    /// Number of datasets to profile concurrently
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u16).range(1..))]
    jobs: Option<u16>,

    /// Output format: text (default), json, or markdown
    #[arg(short = 'f', long, default_value = "text")]
    format: OutputFormat,

    /// Disable coloured output
    #[arg(long)]
    no_color: bool,

    /// Print only; do not write the artifacts
    #[arg(long)]
    no_write: bool,
}

#[derive(Args, Debug)]
struct StageArgs {
    /// Load date as YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<String>,

    /// Root of the staging tree
    #[arg(long)]
    root: Option<PathBuf>,

    /// Prefix below the root
    #[arg(long)]
    prefix: Option<String>,

    /// Directory holding the raw CSV files
    #[arg(short = 'i', long)]
    input_dir: Option<PathBuf>,

    /// Directory holding the report artifacts to stage
    #[arg(short = 'o', long)]
    reports_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
}

fn parse_delimiter(s: &str) -> Result<Delimiter, String> {
    Delimiter::parse(s).ok_or_else(|| format!("expected 'auto', 'tab' or one character, got {s:?}"))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Command::Profile(args) => run_profile(config, &args),
        Command::Stage(args) => run_stage(config, &args),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_profile(mut config: Config, args: &ProfileArgs) -> ExitCode {
    // Flags override the configuration file
    if let Some(dir) = &args.input_dir {
        config.input.dir.clone_from(dir);
    }
    if !args.files.is_empty() {
        config.input.files.clone_from(&args.files);
    }
    if let Some(dir) = &args.reports_dir {
        config.report.dir.clone_from(dir);
    }
    if let Some(delimiter) = args.delimiter {
        config.input.read.delimiter = delimiter;
    }
    if !args.null_values.is_empty() {
        config.input.read.null_values.clone_from(&args.null_values);
    }
    if args.keep_empty {
        config.input.read.keep_empty = true;
    }
    if let Some(jobs) = args.jobs {
        config.input.jobs = usize::from(jobs);
    }
    debug!(?config, "effective configuration");

    let files = match discover_files(&config.input.dir, &config.input.files) {
        Ok(files) => files,
        Err(e) => {
            eprintln!("Error processing {}: {}", config.input.dir.display(), e);
            return ExitCode::FAILURE;
        }
    };
    info!(count = files.len(), dir = %config.input.dir.display(), "profiling datasets");

    let mut profiler = Profiler::with_options(config.input.read.clone());
    profiler.jobs(config.input.jobs);
    let set = profiler.profile_files(&files);

    let color = !args.no_color && std::io::stdout().is_terminal();
    let reporter: Box<dyn Reporter> = match args.format {
        OutputFormat::Text => Box::new(SummaryReporter::new(color)),
        OutputFormat::Json => Box::new(JsonReporter),
        OutputFormat::Markdown => Box::new(MarkdownReporter::new(config.report.thresholds)),
    };
    match reporter.render(&set) {
        Ok(out) => print!("{out}"),
        Err(e) => {
            eprintln!("Error rendering report: {e}");
            return ExitCode::FAILURE;
        }
    }

    // Nothing is written for an empty batch
    if set.is_empty() {
        eprintln!("{}", ProfileError::NothingProfiled);
        return ExitCode::FAILURE;
    }

    if !args.no_write {
        match write_artifacts(&config.report.dir, &set, config.report.thresholds) {
            Ok(artifacts) => {
                if args.format == OutputFormat::Text {
                    println!();
                    println!("Profile document: {}", artifacts.profile_document.display());
                    println!("Quality report: {}", artifacts.quality_report.display());
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {}", config.report.dir.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn run_stage(mut config: Config, args: &StageArgs) -> ExitCode {
    // Reject a bad date before anything is copied
    let date = match args.date.as_deref().map(LoadDate::parse).transpose() {
        Ok(date) => date.unwrap_or_else(LoadDate::today),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(root) = &args.root {
        config.stage.root.clone_from(root);
    }
    if let Some(prefix) = &args.prefix {
        config.stage.prefix.clone_from(prefix);
    }
    if let Some(dir) = &args.input_dir {
        config.input.dir.clone_from(dir);
    }
    if let Some(dir) = &args.reports_dir {
        config.report.dir.clone_from(dir);
    }

    match stage(&config, date) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error processing {}: {}", config.input.dir.display(), e);
            ExitCode::FAILURE
        }
    }
}

/// Stage raw files and any report artifacts; returns true if every file was staged.
fn stage(config: &Config, date: LoadDate) -> Result<bool, ProfileError> {
    let files = discover_files(&config.input.dir, &config.input.files)?;
    let stager = Stager::new(&config.stage.root, config.stage.prefix.as_str(), date);

    let manifest = stager.stage_files(&files);
    let reports = existing_reports(&config.report.dir);
    let report_paths: Vec<&Path> = reports.iter().map(PathBuf::as_path).collect();
    let staged_reports = stager.stage_artifacts(&report_paths)?;
    let manifest_path = stager.manifest_path();
    manifest.write(&manifest_path)?;

    println!("Load date: {}", manifest.load_date);
    println!("Staging root: {}", stager.base_dir().display());
    println!(
        "Files: {} staged, {} failed, {} total",
        manifest.successful, manifest.failed, manifest.total_files
    );
    for (table, file) in &manifest.files {
        if let Some(error) = &file.error {
            println!("  x {table}: {error}");
        }
    }
    println!("Reports staged: {}", staged_reports.len());
    println!("Manifest: {}", manifest_path.display());

    Ok(manifest.failed == 0)
}

fn existing_reports(dir: &Path) -> Vec<PathBuf> {
    [PROFILE_DOCUMENT, QUALITY_REPORT]
        .into_iter()
        .map(|name| dir.join(name))
        .filter(|path| path.is_file())
        .collect()
}
