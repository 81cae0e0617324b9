//! Mock App Store Connect API for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use super::fixtures::localization_id;
use asc_submit::api::AppStoreApi;
use asc_submit::error::{Error, Result};
use asc_submit::types::{
    App, AppStoreState, AppStoreVersion, Build, Localization, Platform, ReviewSubmission,
};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

/// A recorded API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiCall {
    FindApp(String),
    RecentBuilds,
    FindVersion(String),
    CreateVersion(String),
    AttachBuild { version_id: String, build_id: String },
    ListLocalizations(String),
    UpdateReleaseNotes { localization_id: String, notes: String },
    CreateReviewSubmission,
    AddReviewItem { submission_id: String, version_id: String },
    ConfirmReviewSubmission(String),
    SubmitLegacy(String),
}

impl ApiCall {
    /// Whether this call changes remote state
    pub const fn is_mutation(&self) -> bool {
        !matches!(
            self,
            Self::FindApp(_) | Self::RecentBuilds | Self::FindVersion(_) | Self::ListLocalizations(_)
        )
    }
}

/// Hand-written mock of [`AppStoreApi`]
///
/// Features:
/// - Scripted build list per poll (the last entry repeats)
/// - Stored version that `create_version` fills in
/// - Call tracking for verification
/// - Error injection per operation and per locale
pub struct MockAppStore {
    app: Mutex<Option<App>>,
    build_polls: Mutex<VecDeque<Vec<Build>>>,
    version: Mutex<Option<AppStoreVersion>>,
    localizations: Mutex<Vec<Localization>>,
    calls: Mutex<Vec<ApiCall>>,
    // Error injection
    failing_localizations: Mutex<HashSet<String>>,
    error_on_attach: Mutex<Option<String>>,
    error_on_create_submission: Mutex<Option<String>>,
    error_on_add_item: Mutex<Option<String>>,
    error_on_confirm: Mutex<Option<String>>,
    error_on_legacy: Mutex<Option<String>>,
}

fn injected(slot: &Mutex<Option<String>>) -> Result<()> {
    match slot.lock().unwrap().as_ref() {
        Some(detail) => Err(Error::Api {
            status: 409,
            detail: detail.clone(),
        }),
        None => Ok(()),
    }
}

impl MockAppStore {
    /// Create a mock that knows `app` and nothing else
    pub fn with_app(app: App) -> Self {
        Self {
            app: Mutex::new(Some(app)),
            build_polls: Mutex::new(VecDeque::new()),
            version: Mutex::new(None),
            localizations: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failing_localizations: Mutex::new(HashSet::new()),
            error_on_attach: Mutex::new(None),
            error_on_create_submission: Mutex::new(None),
            error_on_add_item: Mutex::new(None),
            error_on_confirm: Mutex::new(None),
            error_on_legacy: Mutex::new(None),
        }
    }

    /// Create a mock with no app registered
    pub fn without_app() -> Self {
        let mock = Self::with_app(super::make_app());
        *mock.app.lock().unwrap() = None;
        mock
    }

    // === Response setup ===

    /// Queue the build list returned by the next poll
    pub fn push_builds(&self, builds: Vec<Build>) {
        self.build_polls.lock().unwrap().push_back(builds);
    }

    /// Set the existing version returned by `find_version`
    pub fn set_version(&self, version: AppStoreVersion) {
        *self.version.lock().unwrap() = Some(version);
    }

    /// Set the localizations of the version
    pub fn set_localizations(&self, localizations: Vec<Localization>) {
        *self.localizations.lock().unwrap() = localizations;
    }

    // === Error injection methods ===

    /// Make release notes updates fail for `locale`
    pub fn fail_locale(&self, locale: &str) {
        self.failing_localizations
            .lock()
            .unwrap()
            .insert(localization_id(locale));
    }

    /// Make `attach_build` return an error
    pub fn fail_attach(&self, msg: &str) {
        *self.error_on_attach.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `create_review_submission` return an error
    pub fn fail_create_submission(&self, msg: &str) {
        *self.error_on_create_submission.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `add_review_item` return an error
    pub fn fail_add_item(&self, msg: &str) {
        *self.error_on_add_item.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `confirm_review_submission` return an error
    pub fn fail_confirm(&self, msg: &str) {
        *self.error_on_confirm.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `submit_legacy` return an error
    pub fn fail_legacy(&self, msg: &str) {
        *self.error_on_legacy.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    /// All calls in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that changed remote state
    pub fn mutations(&self) -> Vec<ApiCall> {
        self.calls()
            .into_iter()
            .filter(ApiCall::is_mutation)
            .collect()
    }

    /// Number of calls matching `pred`
    pub fn count(&self, pred: impl Fn(&ApiCall) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    /// Number of build polls made
    pub fn build_polls(&self) -> usize {
        self.count(|c| matches!(c, ApiCall::RecentBuilds))
    }

    fn record(&self, call: ApiCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl AppStoreApi for MockAppStore {
    async fn find_app(&self, bundle_id: &str) -> Result<Option<App>> {
        self.record(ApiCall::FindApp(bundle_id.to_string()));
        Ok(self
            .app
            .lock()
            .unwrap()
            .clone()
            .filter(|app| app.bundle_id == bundle_id))
    }

    async fn recent_builds(&self, _app_id: &str, limit: u32) -> Result<Vec<Build>> {
        self.record(ApiCall::RecentBuilds);
        let mut polls = self.build_polls.lock().unwrap();
        let builds = if polls.len() > 1 {
            polls.pop_front().unwrap_or_default()
        } else {
            polls.front().cloned().unwrap_or_default()
        };
        Ok(builds.into_iter().take(limit as usize).collect())
    }

    async fn find_version(
        &self,
        _app_id: &str,
        version_string: &str,
        _platform: Platform,
    ) -> Result<Option<AppStoreVersion>> {
        self.record(ApiCall::FindVersion(version_string.to_string()));
        Ok(self
            .version
            .lock()
            .unwrap()
            .clone()
            .filter(|v| v.version_string == version_string))
    }

    async fn create_version(
        &self,
        _app_id: &str,
        version_string: &str,
        _platform: Platform,
    ) -> Result<AppStoreVersion> {
        self.record(ApiCall::CreateVersion(version_string.to_string()));
        let version = AppStoreVersion {
            id: "version-created".to_string(),
            version_string: version_string.to_string(),
            state: AppStoreState::PrepareForSubmission,
        };
        *self.version.lock().unwrap() = Some(version.clone());
        Ok(version)
    }

    async fn attach_build(&self, version_id: &str, build_id: &str) -> Result<()> {
        self.record(ApiCall::AttachBuild {
            version_id: version_id.to_string(),
            build_id: build_id.to_string(),
        });
        injected(&self.error_on_attach)
    }

    async fn list_localizations(&self, version_id: &str) -> Result<Vec<Localization>> {
        self.record(ApiCall::ListLocalizations(version_id.to_string()));
        Ok(self.localizations.lock().unwrap().clone())
    }

    async fn update_release_notes(&self, localization_id: &str, notes: &str) -> Result<()> {
        self.record(ApiCall::UpdateReleaseNotes {
            localization_id: localization_id.to_string(),
            notes: notes.to_string(),
        });
        if self
            .failing_localizations
            .lock()
            .unwrap()
            .contains(localization_id)
        {
            return Err(Error::Api {
                status: 409,
                detail: format!("cannot edit {localization_id}"),
            });
        }
        Ok(())
    }

    async fn create_review_submission(
        &self,
        _app_id: &str,
        _platform: Platform,
    ) -> Result<ReviewSubmission> {
        self.record(ApiCall::CreateReviewSubmission);
        injected(&self.error_on_create_submission)?;
        Ok(ReviewSubmission {
            id: "submission-1".to_string(),
        })
    }

    async fn add_review_item(&self, submission_id: &str, version_id: &str) -> Result<()> {
        self.record(ApiCall::AddReviewItem {
            submission_id: submission_id.to_string(),
            version_id: version_id.to_string(),
        });
        injected(&self.error_on_add_item)
    }

    async fn confirm_review_submission(&self, submission_id: &str) -> Result<()> {
        self.record(ApiCall::ConfirmReviewSubmission(submission_id.to_string()));
        injected(&self.error_on_confirm)
    }

    async fn submit_legacy(&self, version_id: &str) -> Result<()> {
        self.record(ApiCall::SubmitLegacy(version_id.to_string()));
        injected(&self.error_on_legacy)
    }
}
