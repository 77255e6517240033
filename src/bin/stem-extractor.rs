use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use stem_extractor::{
    paths, pipeline, ExtractError, ExtractOptions, ExtractResult, Job, JobMode, Reporter,
};

#[derive(Parser)]
#[command(name = "stem-extractor")]
#[command(about = "Extract instrumental and acapella stems from a URL or a local audio file", long_about = None)]
#[command(version)]
struct Cli {
    /// Entry mode
    #[arg(value_enum)]
    command: Mode,

    /// Source video URL (extract_url)
    #[arg(long)]
    url: Option<String>,

    /// Source audio file path (extract_file)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Destination root directory (defaults to the per-platform
    /// application-support path)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Abort an external tool invocation after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase stderr log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Mode {
    #[value(name = "extract_url")]
    ExtractUrl,
    #[value(name = "extract_file")]
    ExtractFile,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock());

    // Every path from here on answers with a result line and exit code 0;
    // the host reads the outcome from stdout, not from the exit status.
    let mode = match resolve_mode(&cli) {
        Ok(mode) => mode,
        Err(e) => {
            reporter.result(&ExtractResult::failure(&e));
            return ExitCode::SUCCESS;
        }
    };

    let output_root = match cli.output.clone().map(Ok).unwrap_or_else(paths::default_output_dir) {
        Ok(dir) => dir,
        Err(e) => {
            reporter.result(&ExtractResult::failure(&e));
            return ExitCode::SUCCESS;
        }
    };

    let job = Job { mode, output_root };
    let opts = ExtractOptions {
        timeout: cli.timeout.map(Duration::from_secs),
        ..ExtractOptions::default()
    };

    pipeline::run(&job, &opts, &mut reporter);
    ExitCode::SUCCESS
}

fn resolve_mode(cli: &Cli) -> Result<JobMode, ExtractError> {
    match cli.command {
        Mode::ExtractUrl => cli
            .url
            .clone()
            .map(JobMode::Url)
            .ok_or_else(|| ExtractError::Input("URL is required".to_string())),
        Mode::ExtractFile => cli
            .file
            .clone()
            .map(JobMode::File)
            .ok_or_else(|| ExtractError::Input("File path is required".to_string())),
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // stdout is the machine protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
