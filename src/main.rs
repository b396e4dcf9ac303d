use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use autorestic_report::{load_monitors, read_record, report_all, ReportTarget};

#[derive(Parser, Debug)]
#[command(name = "autorestic-report")]
#[command(about = "Report a finished autorestic backup run to the configured monitors")]
struct Args {
    /// Path to the autorestic configuration file
    #[arg(short, long, default_value = ".autorestic.yml")]
    config: PathBuf,

    /// Path to the JSON record of the backup run
    #[arg(short, long)]
    record: PathBuf,

    /// Location that was backed up
    #[arg(short, long)]
    location: String,

    /// Backend the location was backed up to
    #[arg(short, long)]
    backend: String,

    /// Free-form tag attached to the point
    #[arg(short, long, default_value = "")]
    tag: String,

    /// Monitor to report to (repeatable, default: all declared monitors)
    #[arg(short, long = "monitor")]
    monitors: Vec<String>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let monitors = load_monitors(&args.config)?;
    let record = read_record(&args.record)?;
    let target = ReportTarget {
        location: args.location,
        backend: args.backend,
        tag: args.tag,
    };

    if monitors.is_empty() {
        tracing::info!("no monitors declared in {}", args.config.display());
        return Ok(());
    }

    // Build a tokio runtime for the HTTP calls
    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(report_all(&monitors, &args.monitors, &record, &target))?;

    tracing::info!(
        "{} reported, {} disabled, {} failed",
        summary.reported.len(),
        summary.disabled.len(),
        summary.failed.len()
    );

    if !summary.is_success() {
        bail!("failed to report to: {}", summary.failed.join(", "));
    }

    Ok(())
}
