//! App Store Connect API access
//!
//! The release stages only talk to the vendor through [`AppStoreApi`], so
//! they run the same against the HTTP client and against test doubles.

mod client;
mod models;
mod retry;

pub use client::AppStoreConnectClient;
pub use retry::{Backoff, RetryPolicy};

use crate::error::Result;
use crate::types::{App, AppStoreVersion, Build, Localization, Platform, ReviewSubmission};
use async_trait::async_trait;

/// Operations the release workflow needs from App Store Connect
#[async_trait]
pub trait AppStoreApi: Send + Sync {
    /// Find the app registered for a bundle identifier
    async fn find_app(&self, bundle_id: &str) -> Result<Option<App>>;

    /// Most recently uploaded builds of an app, newest first
    async fn recent_builds(&self, app_id: &str, limit: u32) -> Result<Vec<Build>>;

    /// Find a version by exact version string and platform
    async fn find_version(
        &self,
        app_id: &str,
        version_string: &str,
        platform: Platform,
    ) -> Result<Option<AppStoreVersion>>;

    /// Create a new version for the app
    async fn create_version(
        &self,
        app_id: &str,
        version_string: &str,
        platform: Platform,
    ) -> Result<AppStoreVersion>;

    /// Select the build a version ships with
    async fn attach_build(&self, version_id: &str, build_id: &str) -> Result<()>;

    /// Localizations currently attached to a version
    async fn list_localizations(&self, version_id: &str) -> Result<Vec<Localization>>;

    /// Set the "What's New" text of one localization
    async fn update_release_notes(&self, localization_id: &str, notes: &str) -> Result<()>;

    /// Create an empty review submission for the app
    async fn create_review_submission(
        &self,
        app_id: &str,
        platform: Platform,
    ) -> Result<ReviewSubmission>;

    /// Add a version to a review submission
    async fn add_review_item(&self, submission_id: &str, version_id: &str) -> Result<()>;

    /// Mark a review submission as submitted
    async fn confirm_review_submission(&self, submission_id: &str) -> Result<()>;

    /// Submit a version through the deprecated single-call endpoint
    async fn submit_legacy(&self, version_id: &str) -> Result<()>;
}
