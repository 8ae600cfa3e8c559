mod error;
mod input;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use framescope_core::{
    AnalysisConfig, CorrelationConfig, DEFAULT_HTTP_SNIFF_LEN, DEFAULT_TCP_BURST_CAP, Report,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::CliError;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("FRAMESCOPE_BUILD_COMMIT"),
    ")"
);
const EXAMPLES: &str = "Examples:\n  framescope capture analyse capture.pcapng -o report.json\n  framescope capture analyze capture.pcap --stdout --pretty\n  framescope capture analyse 'traces/*.pcap' --stdout --list-exchanges";

#[derive(Parser, Debug)]
#[command(name = "framescope")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Offline dissector for pcap/pcapng captures: frames, flows and request/response exchanges.",
    long_about = None,
    after_help = EXAMPLES
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Operations on capture files.
    Capture {
        #[command(subcommand)]
        command: CaptureCommands,
    },
}

#[derive(Subcommand, Debug)]
enum CaptureCommands {
    /// Analyse a capture file and generate a versioned JSON report.
    #[command(alias = "analyze", after_help = EXAMPLES)]
    Analyse(AnalyseArgs),
}

#[derive(Args, Debug)]
struct AnalyseArgs {
    /// Path to a pcap or pcapng file (a glob matching exactly one file is accepted)
    input: PathBuf,

    /// Output report path (JSON)
    #[arg(short = 'o', long, required_unless_present = "stdout")]
    report: Option<PathBuf>,

    /// Write JSON report to stdout
    #[arg(long, conflicts_with = "report")]
    stdout: bool,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,

    /// Include one row per frame in the report
    #[arg(long)]
    frames: bool,

    /// List exchanges on stderr after analysis
    #[arg(long)]
    list_exchanges: bool,

    /// Bytes counted per frame when pairing TCP bursts
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_TCP_BURST_CAP)]
    burst_cap: usize,

    /// Payload bytes inspected for HTTP start lines
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_HTTP_SNIFF_LEN)]
    http_sniff_len: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Commands::Capture { command } = cli.command;
    let result = match command {
        CaptureCommands::Analyse(args) => cmd_capture_analyse(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint {
            eprintln!("hint: {hint}");
        }
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let default_level = ["warn", "info", "debug", "trace"][usize::from(verbose.min(3))];
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Where the serialized report goes.
enum Sink {
    Stdout,
    File(PathBuf),
}

fn cmd_capture_analyse(args: AnalyseArgs) -> Result<(), CliError> {
    let capture_path = input::resolve(&args.input)?;
    input::ensure_regular_file(&capture_path)?;
    let capture_abs = fs::canonicalize(&capture_path)
        .with_context(|| format!("cannot resolve input path {}", capture_path.display()))?;

    let sink = match (&args.report, args.stdout) {
        (_, true) => Sink::Stdout,
        (Some(path), false) => {
            input::ensure_distinct_output(path, &capture_abs)?;
            Sink::File(path.clone())
        }
        (None, false) => {
            return Err(CliError::new("missing output path").hint("use -o/--report or --stdout"));
        }
    };

    let config = AnalysisConfig {
        include_frames: args.frames,
        correlation: CorrelationConfig {
            tcp_burst_cap: args.burst_cap,
            http_sniff_len: args.http_sniff_len,
        },
    };
    info!(input = %capture_path.display(), "analysing capture");
    debug!(?config, "analysis configuration");

    let report = framescope_core::analyze_capture_file(&capture_path, &config)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("cannot serialize report")?;

    match &sink {
        Sink::Stdout => print!("{json}"),
        Sink::File(path) => write_report(path, &json)?,
    }

    if args.quiet {
        return Ok(());
    }
    if args.list_exchanges {
        print_exchanges(&report);
    }
    if let Sink::File(path) = &sink {
        eprintln!("OK: report written -> {}", path.display());
    }
    Ok(())
}

fn write_report(path: &Path, json: &str) -> anyhow::Result<()> {
    let dir = path.parent().filter(|dir| !dir.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("cannot create output directory {}", dir.display()))?;
    }
    fs::write(path, json).with_context(|| format!("cannot write report {}", path.display()))
}

fn print_exchanges(report: &Report) {
    eprintln!("Exchanges ({}):", report.exchanges.len());
    for exchange in &report.exchanges {
        eprintln!(
            "  {} {} {}",
            exchange.protocol.as_str(),
            exchange.status.as_str(),
            exchange.id
        );
    }
}
