//! End-to-end release run
//!
//! Drives the stages in order against any [`AppStoreApi`]. Partial progress
//! (e.g. a version created but not submitted) is reported, never rolled back.

use crate::api::AppStoreApi;
use crate::config::ReleaseOptions;
use crate::error::{Error, Result};
use crate::submit::{
    get_or_create_version, link_build, submit_for_review, update_release_notes, wait_for_build,
    NotesReport, Phase, ProgressCallback, SubmissionOutcome, VersionResolution, DRY_RUN_BUILD_ID,
};
use crate::types::{App, AppStoreState, VersionSpec};

/// How the release run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The version was already submitted or released; nothing was changed
    AlreadySubmitted(AppStoreState),
    /// The pipeline ran to the submission step
    Submission(SubmissionOutcome),
}

/// Everything a release run produced
#[derive(Debug, Clone)]
pub struct ReleaseReport {
    /// App the release belongs to
    pub app: App,
    /// ID of the processed build (placeholder in a dry run)
    pub build_id: String,
    /// Version that was found or created
    pub version: VersionResolution,
    /// Release notes results, when that stage ran
    pub notes: Option<NotesReport>,
    /// Final outcome
    pub outcome: ReleaseOutcome,
}

/// Look up the app for a bundle identifier
pub async fn find_app(
    api: &dyn AppStoreApi,
    bundle_id: &str,
    progress: &dyn ProgressCallback,
) -> Result<App> {
    progress
        .on_message(&format!("Finding app with bundle ID: {bundle_id}"))
        .await;

    let app = api
        .find_app(bundle_id)
        .await?
        .ok_or_else(|| Error::AppNotFound(bundle_id.to_string()))?;

    let short_id: String = app.id.chars().take(12).collect();
    progress
        .on_success(&format!("Found app: {} (ID: {short_id}...)", app.name))
        .await;
    Ok(app)
}

/// Run the release pipeline for `bundle_id` at `version`
pub async fn run_release(
    api: &dyn AppStoreApi,
    bundle_id: &str,
    version: &VersionSpec,
    options: &ReleaseOptions,
    progress: &dyn ProgressCallback,
) -> Result<ReleaseReport> {
    let dry_run = options.dry_run;

    progress.on_phase(Phase::FindingApp).await;
    let app = find_app(api, bundle_id, progress).await?;

    progress.on_phase(Phase::WaitingForBuild).await;
    let build_id = if dry_run {
        progress.on_dry_run("Skipping build processing wait").await;
        DRY_RUN_BUILD_ID.to_string()
    } else {
        let wait = &options.wait;
        let target = version.build_number.as_deref().unwrap_or("latest");
        progress
            .on_message(&format!(
                "Waiting for build {target} to finish processing (max {} min)...",
                wait.timeout.as_secs() / 60
            ))
            .await;
        let build =
            wait_for_build(api, &app.id, version.build_number.as_deref(), wait, progress).await?;
        progress
            .on_success(&format!("Build {} is ready!", build.version))
            .await;
        build.id
    };

    progress.on_phase(Phase::ResolvingVersion).await;
    let resolution = get_or_create_version(
        api,
        &app.id,
        &version.version,
        options.platform,
        dry_run,
        progress,
    )
    .await?;

    let Some(version_id) = resolution.version_id().map(ToString::to_string) else {
        let state = resolution.version().state;
        progress.on_phase(Phase::Complete).await;
        return Ok(ReleaseReport {
            app,
            build_id,
            version: resolution,
            notes: None,
            outcome: ReleaseOutcome::AlreadySubmitted(state),
        });
    };

    progress.on_phase(Phase::LinkingBuild).await;
    link_build(api, &version_id, &build_id, dry_run, progress).await?;

    progress.on_phase(Phase::AddingReleaseNotes).await;
    let notes =
        update_release_notes(api, &version_id, &options.release_notes, dry_run, progress).await?;

    progress.on_phase(Phase::SubmittingForReview).await;
    let submission = submit_for_review(
        api,
        &app.id,
        &version_id,
        options.platform,
        dry_run,
        progress,
    )
    .await;

    progress.on_phase(Phase::Complete).await;

    Ok(ReleaseReport {
        app,
        build_id,
        version: resolution,
        notes: Some(notes),
        outcome: ReleaseOutcome::Submission(submission),
    })
}
