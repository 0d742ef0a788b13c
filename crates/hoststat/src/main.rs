//! hoststat - host metrics snapshot tool.
//!
//! Collects one snapshot of disk, memory, swap and CPU figures and prints it
//! as JSON or text. With `--watch` it repeats until interrupted.

mod render;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use hoststat_core::collector::{CollectorConfig, MetricsCollector, RealFs};
use hoststat_core::model::MetricsSnapshot;
use hoststat_core::units::SizeUnit;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Host metrics snapshot tool.
#[derive(Parser)]
#[command(name = "hoststat", about = "Host metrics snapshot tool", version = hoststat_core::VERSION)]
struct Args {
    /// Directory whose filesystem capacity is reported.
    #[arg(short, long, default_value = ".")]
    dir: PathBuf,

    /// Path to /proc filesystem (for testing/mocking).
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Pause before each CPU load read, in milliseconds.
    #[arg(long, default_value = "100")]
    sample_ms: u64,

    /// Also estimate this process's CPU usage from two CPU time samples.
    #[arg(long)]
    process_usage: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,

    /// Fixed unit for disk figures in text output (kb, mb, gb).
    #[arg(long, value_parser = parse_unit)]
    unit: Option<SizeUnit>,

    /// Repeat every SECS seconds until Ctrl-C.
    #[arg(short, long, value_name = "SECS")]
    watch: Option<u64>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace). Default is warn level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

fn parse_unit(s: &str) -> Result<SizeUnit, String> {
    s.parse::<SizeUnit>().map_err(|e| e.to_string())
}

/// Initializes the tracing subscriber on stderr so stdout carries only snapshots.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["hoststat", "hoststat_core"] {
        if let Ok(directive) = format!("{target}={level}").parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_snapshot(snapshot: &MetricsSnapshot, args: &Args) -> Result<(), serde_json::Error> {
    match args.format {
        OutputFormat::Json if args.pretty => println!("{}", serde_json::to_string_pretty(snapshot)?),
        OutputFormat::Json => println!("{}", serde_json::to_string(snapshot)?),
        OutputFormat::Text => print!("{}", render::render_text(snapshot, args.unit)),
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose, args.quiet);

    debug!("hoststat {} starting", hoststat_core::VERSION);

    let config = CollectorConfig::default()
        .with_working_dir(args.dir.clone())
        .with_proc_path(&args.proc_path)
        .with_sample_interval(Duration::from_millis(args.sample_ms))
        .with_process_usage(args.process_usage);
    let collector = MetricsCollector::new(RealFs::new(), config);

    let Some(watch_secs) = args.watch else {
        return match print_snapshot(&collector.collect(), &args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                error!("Failed to serialize snapshot: {}", e);
                ExitCode::FAILURE
            }
        };
    };

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let interval = Duration::from_secs(watch_secs);
    info!("Watching every {}s", watch_secs);

    while running.load(Ordering::SeqCst) {
        if let Err(e) = print_snapshot(&collector.collect(), &args) {
            error!("Failed to serialize snapshot: {}", e);
            return ExitCode::FAILURE;
        }

        // Sleep with periodic checks for shutdown signal
        let sleep_interval = Duration::from_millis(100);
        let mut remaining = interval;
        while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
            let sleep_time = remaining.min(sleep_interval);
            std::thread::sleep(sleep_time);
            remaining = remaining.saturating_sub(sleep_time);
        }
    }

    info!("Shutting down...");
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["hoststat"]).unwrap();
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.proc_path, "/proc");
        assert_eq!(args.sample_ms, 100);
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.watch.is_none());
        assert!(args.unit.is_none());
    }

    #[test]
    fn test_args_text_with_unit() {
        let args =
            Args::try_parse_from(["hoststat", "-f", "text", "--unit", "GB", "-w", "5"]).unwrap();
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.unit, Some(SizeUnit::Gb));
        assert_eq!(args.watch, Some(5));
    }

    #[test]
    fn test_args_reject_unknown_unit() {
        assert!(Args::try_parse_from(["hoststat", "--unit", "tb"]).is_err());
    }
}
