//! Release notes for every localization

use crate::api::AppStoreApi;
use crate::error::{Error, Result};
use crate::submit::{LocaleStatus, ProgressCallback, DRY_RUN_VERSION_ID};

/// Per-locale outcome of a release notes update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesReport {
    /// Locales whose notes were written
    pub updated: Vec<String>,
    /// Locales that failed, with the error message
    pub failed: Vec<(String, String)>,
    /// Locales that would be written (dry run)
    pub planned: Vec<String>,
}

impl NotesReport {
    /// Number of localizations considered
    pub fn total(&self) -> usize {
        self.updated.len() + self.failed.len() + self.planned.len()
    }

    /// Some but not all updates failed
    pub fn is_partial(&self) -> bool {
        !self.updated.is_empty() && !self.failed.is_empty()
    }
}

/// Set the release notes of every localization on a version
///
/// Locales are updated independently; failures are reported per locale and
/// do not stop the others. Succeeds when at least one locale was updated.
pub async fn update_release_notes(
    api: &dyn AppStoreApi,
    version_id: &str,
    notes: &str,
    dry_run: bool,
    progress: &dyn ProgressCallback,
) -> Result<NotesReport> {
    let mut report = NotesReport::default();

    if dry_run && version_id == DRY_RUN_VERSION_ID {
        progress
            .on_dry_run(&format!("Would add release notes to all locales: \"{notes}\""))
            .await;
        return Ok(report);
    }

    let localizations = api.list_localizations(version_id).await?;

    if dry_run {
        if localizations.is_empty() {
            progress.on_warning("No localizations found").await;
        }
        for loc in localizations {
            progress.on_locale(&loc.locale, LocaleStatus::WouldUpdate).await;
            report.planned.push(loc.locale);
        }
        progress
            .on_dry_run(&format!("Would add release notes: \"{notes}\""))
            .await;
        return Ok(report);
    }

    if localizations.is_empty() {
        return Err(Error::NoLocalizations(version_id.to_string()));
    }

    for loc in localizations {
        match api.update_release_notes(&loc.id, notes).await {
            Ok(()) => {
                progress.on_locale(&loc.locale, LocaleStatus::Updated).await;
                report.updated.push(loc.locale);
            }
            Err(e) => {
                let msg = e.to_string();
                progress
                    .on_locale(&loc.locale, LocaleStatus::Failed(msg.clone()))
                    .await;
                report.failed.push((loc.locale, msg));
            }
        }
    }

    let total = report.total();
    if report.updated.is_empty() {
        return Err(Error::ReleaseNotesFailed(total));
    }

    if report.is_partial() {
        progress
            .on_warning(&format!(
                "Release notes added to {}/{total} localizations",
                report.updated.len()
            ))
            .await;
    } else {
        progress
            .on_success(&format!("Release notes added to all {total} localizations"))
            .await;
    }

    Ok(report)
}
