//! Review submission

use crate::api::AppStoreApi;
use crate::submit::ProgressCallback;
use crate::types::Platform;

/// How the review submission ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Submitted through the review submissions API
    Submitted {
        /// ID of the confirmed review submission
        submission_id: String,
    },
    /// Submitted through the legacy single-call endpoint
    SubmittedLegacy,
    /// Could not finish; the user has to submit in App Store Connect
    ManualActionRequired {
        /// What failed
        reason: String,
        /// Submission created before the failure, if any
        submission_id: Option<String>,
    },
    /// Dry run, nothing submitted
    DryRun,
}

impl SubmissionOutcome {
    /// Whether the version is now waiting for review
    pub const fn is_submitted(&self) -> bool {
        matches!(self, Self::Submitted { .. } | Self::SubmittedLegacy)
    }
}

/// Submit a version for review
///
/// Creates a review submission, adds the version to it and confirms it. If
/// the submission cannot be created, falls back once to the legacy endpoint.
/// A failure after creation is not retried elsewhere since the submission
/// already exists remotely. Never fails; the outcome says what happened.
pub async fn submit_for_review(
    api: &dyn AppStoreApi,
    app_id: &str,
    version_id: &str,
    platform: Platform,
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> SubmissionOutcome {
    if dry_run {
        progress.on_dry_run("Would submit for review").await;
        return SubmissionOutcome::DryRun;
    }

    progress.on_message("Creating review submission...").await;
    let submission = match api.create_review_submission(app_id, platform).await {
        Ok(submission) => submission,
        Err(e) => {
            progress.on_error(&e).await;
            progress.on_message("Trying legacy submission endpoint...").await;
            return submit_legacy(api, version_id, progress).await;
        }
    };
    progress
        .on_success(&format!("Created review submission: {}", submission.id))
        .await;

    progress.on_message("Adding version to submission...").await;
    if let Err(e) = api.add_review_item(&submission.id, version_id).await {
        progress.on_error(&e).await;
        return SubmissionOutcome::ManualActionRequired {
            reason: format!("failed to add version to submission: {e}"),
            submission_id: Some(submission.id),
        };
    }

    progress.on_message("Confirming submission...").await;
    if let Err(e) = api.confirm_review_submission(&submission.id).await {
        progress.on_error(&e).await;
        return SubmissionOutcome::ManualActionRequired {
            reason: format!("failed to confirm submission: {e}"),
            submission_id: Some(submission.id),
        };
    }

    progress.on_success("Submitted for review!").await;
    SubmissionOutcome::Submitted {
        submission_id: submission.id,
    }
}

async fn submit_legacy(
    api: &dyn AppStoreApi,
    version_id: &str,
    progress: &dyn ProgressCallback,
) -> SubmissionOutcome {
    match api.submit_legacy(version_id).await {
        Ok(()) => {
            progress.on_success("Submitted for review!").await;
            SubmissionOutcome::SubmittedLegacy
        }
        Err(e) => {
            progress.on_error(&e).await;
            SubmissionOutcome::ManualActionRequired {
                reason: format!("legacy submission failed: {e}"),
                submission_id: None,
            }
        }
    }
}
