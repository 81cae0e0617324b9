//! Progress callback trait for interface-agnostic updates
//!
//! The pipeline reports what it is doing through this trait; the CLI prints
//! it, tests record it.

use crate::error::Error;
use crate::types::Build;
use async_trait::async_trait;
use std::fmt;

/// Release pipeline phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Looking up the app by bundle ID
    FindingApp,
    /// Waiting for the build to finish processing
    WaitingForBuild,
    /// Finding or creating the App Store version
    ResolvingVersion,
    /// Attaching the build to the version
    LinkingBuild,
    /// Updating release notes for each localization
    AddingReleaseNotes,
    /// Creating and confirming the review submission
    SubmittingForReview,
    /// Pipeline finished
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::FindingApp => "Finding app",
            Self::WaitingForBuild => "Waiting for build processing",
            Self::ResolvingVersion => "Resolving version",
            Self::LinkingBuild => "Linking build to version",
            Self::AddingReleaseNotes => "Adding release notes",
            Self::SubmittingForReview => "Submitting for review",
            Self::Complete => "Done",
        };
        f.write_str(s)
    }
}

/// Result of updating one localization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleStatus {
    /// Release notes were written
    Updated,
    /// Dry run: release notes would be written
    WouldUpdate,
    /// Update failed with error message
    Failed(String),
}

impl fmt::Display for LocaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::WouldUpdate => write!(f, "would update"),
            Self::Failed(msg) => write!(f, "failed: {msg}"),
        }
    }
}

/// Progress callback trait
///
/// Implement this trait to receive progress updates during a release run.
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called when entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Called when the awaited build is seen in a new state
    async fn on_build_state(&self, build: &Build);

    /// Called after each localization update
    async fn on_locale(&self, locale: &str, status: LocaleStatus);

    /// Called instead of a mutating call during a dry run
    async fn on_dry_run(&self, action: &str);

    /// Called when a step completed
    async fn on_success(&self, message: &str);

    /// Called when something needs attention but the run continues
    async fn on_warning(&self, message: &str);

    /// Called when an error occurs (non-fatal)
    async fn on_error(&self, error: &Error);

    /// Called with a general status message
    async fn on_message(&self, message: &str);
}

/// No-op progress callback for testing or when progress isn't needed
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_phase(&self, _phase: Phase) {}
    async fn on_build_state(&self, _build: &Build) {}
    async fn on_locale(&self, _locale: &str, _status: LocaleStatus) {}
    async fn on_dry_run(&self, _action: &str) {}
    async fn on_success(&self, _message: &str) {}
    async fn on_warning(&self, _message: &str) {}
    async fn on_error(&self, _error: &Error) {}
    async fn on_message(&self, _message: &str) {}
}
