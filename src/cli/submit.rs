//! Submit command - release a version to App Store review

use crate::cli::progress::CliProgress;
use crate::cli::style::{self, arrow, check, rule, Stylize};
use anstream::{eprintln, println};
use asc_submit::api::AppStoreConnectClient;
use asc_submit::config::{Config, ReleaseOptions, DEFAULT_RELEASE_NOTES};
use asc_submit::error::{Error, Result};
use asc_submit::project::discover_bundle_id;
use asc_submit::submit::{
    run_release, NotesReport, ReleaseOutcome, ReleaseReport, SubmissionOutcome, WaitOptions,
};
use asc_submit::types::{Platform, VersionSpec};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// App Store Connect web UI
const APP_STORE_CONNECT_URL: &str = "https://appstoreconnect.apple.com";

/// Options for the submit command
#[derive(Debug, Clone)]
pub struct SubmitArgs {
    /// Version argument as typed (`X.Y.Z` or `X.Y.Z+BUILD`)
    pub version: String,
    /// Project root used for bundle ID discovery
    pub project_path: PathBuf,
    /// Bundle ID override, skips discovery
    pub bundle_id: Option<String>,
    /// Preview without mutating anything
    pub dry_run: bool,
    /// Platform of the App Store version
    pub platform: Platform,
    /// Release notes text
    pub release_notes: Option<String>,
    /// File to read release notes from
    pub release_notes_file: Option<PathBuf>,
    /// Build processing timeout in minutes
    pub max_wait_minutes: u64,
}

/// Run the submit command
pub async fn run_submit(args: &SubmitArgs) -> Result<()> {
    let version: VersionSpec = args.version.parse()?;
    let config = Config::from_env()?;
    let client = AppStoreConnectClient::new(&config)?;
    debug!(base_url = %config.base_url, key_id = %config.credentials.key_id, "client ready");

    print_banner(args.dry_run);

    println!("Version: {}", version.version.accent());
    match &version.build_number {
        Some(build) => println!("Build:   {}", build.accent()),
        None => println!("Build:   {}", "latest".muted()),
    }

    let release_notes = resolve_release_notes(
        args.release_notes.as_deref(),
        args.release_notes_file.as_deref(),
    )?;

    let bundle_id = match &args.bundle_id {
        Some(id) => id.clone(),
        None => {
            let id = discover_bundle_id(&args.project_path)?;
            println!("Bundle ID: {} {}", id.accent(), "(detected)".muted());
            id
        }
    };

    let options = ReleaseOptions {
        dry_run: args.dry_run,
        platform: args.platform,
        release_notes,
        wait: WaitOptions {
            timeout: Duration::from_secs(args.max_wait_minutes.saturating_mul(60)),
            ..WaitOptions::default()
        },
    };

    let progress = CliProgress::new();
    let report = run_release(&client, &bundle_id, &version, &options, &progress).await?;

    print_summary(&report, &version, &options);
    Ok(())
}

/// Pick release notes from the flag, the file, or the default text
fn resolve_release_notes(text: Option<&str>, file: Option<&Path>) -> Result<String> {
    if let Some(path) = file {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ReleaseNotesFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(contents.trim().to_string());
    }
    Ok(text.map_or_else(|| DEFAULT_RELEASE_NOTES.to_string(), ToString::to_string))
}

fn print_banner(dry_run: bool) {
    println!("{}", rule());
    println!("{}", "App Store Connect Release".emphasis());
    println!("{}", rule());
    if dry_run {
        println!();
        println!(
            "{}",
            "DRY RUN MODE - No changes will be made".warn().for_stdout()
        );
    }
    println!();
}

fn print_summary(report: &ReleaseReport, version: &VersionSpec, options: &ReleaseOptions) {
    println!();
    println!("{}", rule());

    match &report.outcome {
        ReleaseOutcome::AlreadySubmitted(state) => {
            println!(
                "{} Version {} is already submitted (State: {})",
                check(),
                version.version.accent(),
                state
            );
            println!("{}", "Nothing to do.".muted());
        }
        ReleaseOutcome::Submission(SubmissionOutcome::DryRun) => {
            println!(
                "{}",
                "DRY RUN COMPLETE - No changes were made".warn().for_stdout()
            );
        }
        ReleaseOutcome::Submission(outcome) if outcome.is_submitted() => {
            println!(
                "{} {}",
                check(),
                "Success! App submitted for review".success()
            );
        }
        ReleaseOutcome::Submission(SubmissionOutcome::ManualActionRequired {
            reason,
            submission_id,
        }) => {
            println!(
                "{}",
                "Setup complete, but submission requires manual action"
                    .warn()
                    .for_stdout()
            );
            println!("  {}", reason.muted());
            if let Some(id) = submission_id {
                println!("  Review submission: {}", id.accent());
            }
            println!(
                "  {} Open App Store Connect and click 'Submit for Review'",
                arrow()
            );
        }
        ReleaseOutcome::Submission(_) => {}
    }

    println!("{}", rule());
    println!();
    println!("App:           {} ({})", report.app.name, report.app.bundle_id.accent());
    println!("Version:       {}", version.to_string().accent());
    println!("Build ID:      {}", report.build_id.muted());
    if let Some(notes) = &report.notes {
        println!("Release notes: {}", options.release_notes);
        print_notes_counts(notes);
    }
    println!();
    println!(
        "View status at: {}",
        style::hyperlink_url(style::Stream::Stdout, APP_STORE_CONNECT_URL).accent()
    );
}

fn print_notes_counts(notes: &NotesReport) {
    if !notes.planned.is_empty() {
        println!(
            "               {}",
            format!("{} localizations would be updated", notes.planned.len()).muted()
        );
    } else if notes.total() > 0 {
        println!(
            "               {}",
            format!("{}/{} localizations updated", notes.updated.len(), notes.total()).muted()
        );
    }
    for (locale, msg) in &notes.failed {
        eprintln!("  {} {}: {}", style::cross(), locale, msg.warn());
    }
}
