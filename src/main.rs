//! asc-submit - App Store Connect release automation
//!
//! CLI binary that takes an uploaded build through to App Store review.

use anstream::eprintln;
use asc_submit::types::Platform;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, Registry};

mod cli;

use cli::style::Stylize;

/// Exit status after Ctrl-C
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "asc-submit")]
#[command(about = "Submit an uploaded build to App Store review")]
#[command(version)]
struct Cli {
    /// Version to release, e.g. 1.13.0 or 1.13.0+30 to wait for build 30
    #[arg(id = "release_version", value_name = "VERSION")]
    version: String,

    /// Path to the app project (defaults to current directory)
    #[arg(short, long)]
    project_path: Option<PathBuf>,

    /// Bundle ID to release, skips detection from the Xcode project
    #[arg(long)]
    bundle_id: Option<String>,

    /// Dry run - show what would be done without making changes
    #[arg(long)]
    dry_run: bool,

    /// Platform of the App Store version
    #[arg(long, value_enum, default_value_t = PlatformArg::Ios)]
    platform: PlatformArg,

    /// "What's New" text for every localization
    #[arg(long, conflicts_with = "release_notes_file")]
    release_notes: Option<String>,

    /// Read the "What's New" text from a file
    #[arg(long)]
    release_notes_file: Option<PathBuf>,

    /// Maximum minutes to wait for build processing
    #[arg(long, default_value_t = 60)]
    max_wait_minutes: u64,

    /// Log API requests and retries to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlatformArg {
    Ios,
    #[value(name = "macos")]
    MacOs,
    #[value(name = "tvos")]
    TvOs,
    #[value(name = "visionos")]
    VisionOs,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Ios => Self::Ios,
            PlatformArg::MacOs => Self::MacOs,
            PlatformArg::TvOs => Self::TvOs,
            PlatformArg::VisionOs => Self::VisionOs,
        }
    }
}

impl From<Cli> for cli::SubmitArgs {
    fn from(args: Cli) -> Self {
        Self {
            version: args.version,
            project_path: args.project_path.unwrap_or_else(|| {
                std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
            }),
            bundle_id: args.bundle_id,
            dry_run: args.dry_run,
            platform: args.platform.into(),
            release_notes: args.release_notes,
            release_notes_file: args.release_notes_file,
            max_wait_minutes: args.max_wait_minutes,
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let subscriber = Registry::default().with(
        fmt::Layer::new()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(Targets::new().with_target("asc_submit", level)),
    );

    // Only fails if a subscriber is already installed.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

async fn run(args: cli::SubmitArgs) -> anyhow::Result<()> {
    cli::run_submit(&args).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_logging(args.verbose);

    tokio::select! {
        result = run(args.into()) => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                match err.downcast_ref::<asc_submit::error::Error>() {
                    Some(e) => cli::report_error(e),
                    None => eprintln!("{}: {err:#}", "Unexpected error".error()),
                }
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!();
            eprintln!("{}", "Interrupted by user".warn());
            ExitCode::from(EXIT_INTERRUPTED)
        }
    }
}
