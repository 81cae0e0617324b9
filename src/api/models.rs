//! JSON:API wire models and request bodies

use crate::types::{
    App, AppStoreState, AppStoreVersion, Build, Localization, Platform, ProcessingState,
    ReviewSubmission,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

/// Top-level `{ "data": ... }` document
#[derive(Debug, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

/// A resource object with typed attributes
#[derive(Debug, Deserialize)]
pub struct Resource<A> {
    pub id: String,
    #[serde(default)]
    pub attributes: A,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppAttributes {
    pub name: Option<String>,
    pub bundle_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildAttributes {
    pub version: Option<String>,
    pub processing_state: Option<ProcessingState>,
    pub uploaded_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VersionAttributes {
    pub version_string: Option<String>,
    pub app_store_state: Option<AppStoreState>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LocalizationAttributes {
    pub locale: Option<String>,
    pub whats_new: Option<String>,
}

/// Resource with no attributes we care about
#[derive(Debug, Default, Deserialize)]
pub struct Empty {}

/// `{ "errors": [...] }` body of a failed request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorDocument {
    pub errors: Vec<ErrorObject>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorObject {
    pub title: Option<String>,
    pub detail: Option<String>,
}

impl ErrorDocument {
    /// Most useful message from the first error, if any
    pub fn first_detail(&self) -> Option<String> {
        let first = self.errors.first()?;
        first.detail.clone().or_else(|| first.title.clone())
    }
}

impl Resource<AppAttributes> {
    pub fn into_app(self, bundle_id: &str) -> App {
        App {
            id: self.id,
            name: self.attributes.name.unwrap_or_default(),
            bundle_id: self
                .attributes
                .bundle_id
                .unwrap_or_else(|| bundle_id.to_string()),
        }
    }
}

impl From<Resource<BuildAttributes>> for Build {
    fn from(r: Resource<BuildAttributes>) -> Self {
        Self {
            id: r.id,
            version: r.attributes.version.unwrap_or_else(|| "unknown".to_string()),
            processing_state: r
                .attributes
                .processing_state
                .unwrap_or(ProcessingState::Unknown),
            uploaded_date: r
                .attributes
                .uploaded_date
                .and_then(|d| DateTime::parse_from_rfc3339(&d).ok())
                .map(|d| d.with_timezone(&Utc)),
        }
    }
}

impl Resource<VersionAttributes> {
    pub fn into_version(self, version_string: &str) -> AppStoreVersion {
        AppStoreVersion {
            id: self.id,
            version_string: self
                .attributes
                .version_string
                .unwrap_or_else(|| version_string.to_string()),
            state: self
                .attributes
                .app_store_state
                .unwrap_or(AppStoreState::Unknown),
        }
    }
}

impl From<Resource<LocalizationAttributes>> for Localization {
    fn from(r: Resource<LocalizationAttributes>) -> Self {
        Self {
            id: r.id,
            locale: r.attributes.locale.unwrap_or_else(|| "unknown".to_string()),
            whats_new: r.attributes.whats_new,
        }
    }
}

impl From<Resource<Empty>> for ReviewSubmission {
    fn from(r: Resource<Empty>) -> Self {
        Self { id: r.id }
    }
}

fn linkage(kind: &str, id: &str) -> Value {
    json!({ "data": { "type": kind, "id": id } })
}

pub fn create_version_body(app_id: &str, version_string: &str, platform: Platform) -> Value {
    json!({
        "data": {
            "type": "appStoreVersions",
            "attributes": {
                "platform": platform.as_api_str(),
                "versionString": version_string,
            },
            "relationships": {
                "app": linkage("apps", app_id),
            },
        }
    })
}

pub fn attach_build_body(version_id: &str, build_id: &str) -> Value {
    json!({
        "data": {
            "type": "appStoreVersions",
            "id": version_id,
            "relationships": {
                "build": linkage("builds", build_id),
            },
        }
    })
}

pub fn release_notes_body(localization_id: &str, notes: &str) -> Value {
    json!({
        "data": {
            "type": "appStoreVersionLocalizations",
            "id": localization_id,
            "attributes": { "whatsNew": notes },
        }
    })
}

pub fn create_review_submission_body(app_id: &str, platform: Platform) -> Value {
    json!({
        "data": {
            "type": "reviewSubmissions",
            "attributes": { "platform": platform.as_api_str() },
            "relationships": {
                "app": linkage("apps", app_id),
            },
        }
    })
}

pub fn review_item_body(submission_id: &str, version_id: &str) -> Value {
    json!({
        "data": {
            "type": "reviewSubmissionItems",
            "relationships": {
                "reviewSubmission": linkage("reviewSubmissions", submission_id),
                "appStoreVersion": linkage("appStoreVersions", version_id),
            },
        }
    })
}

pub fn confirm_submission_body(submission_id: &str) -> Value {
    json!({
        "data": {
            "type": "reviewSubmissions",
            "id": submission_id,
            "attributes": { "submitted": true },
        }
    })
}

pub fn legacy_submission_body(version_id: &str) -> Value {
    json!({
        "data": {
            "type": "appStoreVersionSubmissions",
            "relationships": {
                "appStoreVersion": linkage("appStoreVersions", version_id),
            },
        }
    })
}
