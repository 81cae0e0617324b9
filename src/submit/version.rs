//! Version resolution and build linking

use crate::api::AppStoreApi;
use crate::error::Result;
use crate::submit::{ProgressCallback, DRY_RUN_VERSION_ID};
use crate::types::{AppStoreState, AppStoreVersion, Platform};

/// What version resolution found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionResolution {
    /// Version existed and can still be edited
    Existing(AppStoreVersion),
    /// Version was created by this run (placeholder in a dry run)
    Created(AppStoreVersion),
    /// Version is already submitted or released; nothing to do
    AlreadySubmitted(AppStoreVersion),
}

impl VersionResolution {
    /// The version record, whatever its state
    pub const fn version(&self) -> &AppStoreVersion {
        match self {
            Self::Existing(v) | Self::Created(v) | Self::AlreadySubmitted(v) => v,
        }
    }

    /// ID of the version to continue with, `None` when already submitted
    pub fn version_id(&self) -> Option<&str> {
        match self {
            Self::Existing(v) | Self::Created(v) => Some(&v.id),
            Self::AlreadySubmitted(_) => None,
        }
    }
}

/// Find the version for `version_string`, creating it when missing
///
/// Never creates a duplicate: an existing version is always reused, and one
/// already in review or released is reported as [`VersionResolution::AlreadySubmitted`].
pub async fn get_or_create_version(
    api: &dyn AppStoreApi,
    app_id: &str,
    version_string: &str,
    platform: Platform,
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> Result<VersionResolution> {
    progress
        .on_message(&format!("Looking for version {version_string}..."))
        .await;

    if let Some(existing) = api.find_version(app_id, version_string, platform).await? {
        progress
            .on_success(&format!(
                "Found existing version: {} (State: {})",
                existing.version_string, existing.state
            ))
            .await;

        if existing.state.is_submitted() {
            progress
                .on_warning(&format!(
                    "Version already in state: {}. Skipping submission",
                    existing.state
                ))
                .await;
            return Ok(VersionResolution::AlreadySubmitted(existing));
        }

        return Ok(VersionResolution::Existing(existing));
    }

    if dry_run {
        progress
            .on_dry_run(&format!("Would create new version {version_string}"))
            .await;
        return Ok(VersionResolution::Created(AppStoreVersion {
            id: DRY_RUN_VERSION_ID.to_string(),
            version_string: version_string.to_string(),
            state: AppStoreState::PrepareForSubmission,
        }));
    }

    progress
        .on_message(&format!("Creating new version {version_string}..."))
        .await;
    let created = api.create_version(app_id, version_string, platform).await?;
    progress
        .on_success(&format!("Created version: {}", created.version_string))
        .await;

    Ok(VersionResolution::Created(created))
}

/// Attach a build to a version
pub async fn link_build(
    api: &dyn AppStoreApi,
    version_id: &str,
    build_id: &str,
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> Result<()> {
    if dry_run {
        progress.on_dry_run("Would link build to version").await;
        return Ok(());
    }

    api.attach_build(version_id, build_id).await?;
    progress.on_success("Build linked to version").await;
    Ok(())
}
