//! Core types for asc-submit

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Version argument split into marketing version and optional build number
///
/// `1.13.0+30` becomes version `1.13.0`, build `30`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    /// Marketing version (`CFBundleShortVersionString`)
    pub version: String,
    /// Build number (`CFBundleVersion`), if one was given
    pub build_number: Option<String>,
}

impl FromStr for VersionSpec {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidVersion(s.to_string());
        let (version, build_number) = match s.trim().split_once('+') {
            Some((version, build)) => {
                if build.is_empty() || build.contains('+') || build.contains(char::is_whitespace)
                {
                    return Err(invalid());
                }
                (version, Some(build.to_string()))
            }
            None => (s.trim(), None),
        };

        let components: Vec<&str> = version.split('.').collect();
        let well_formed = (1..=3).contains(&components.len())
            && components
                .iter()
                .all(|c| !c.is_empty() && c.chars().all(|ch| ch.is_ascii_digit()));
        if !well_formed {
            return Err(invalid());
        }

        Ok(Self {
            version: version.to_string(),
            build_number,
        })
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.build_number {
            Some(build) => write!(f, "{} (Build {build})", self.version),
            None => write!(f, "{}", self.version),
        }
    }
}

/// App Store platform a version belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    /// iOS / iPadOS
    #[default]
    Ios,
    /// macOS
    MacOs,
    /// tvOS
    TvOs,
    /// visionOS
    VisionOs,
}

impl Platform {
    /// Value used by the API in filters and attributes
    pub const fn as_api_str(self) -> &'static str {
        match self {
            Self::Ios => "IOS",
            Self::MacOs => "MAC_OS",
            Self::TvOs => "TV_OS",
            Self::VisionOs => "VISION_OS",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_str())
    }
}

/// An app registered in App Store Connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct App {
    /// App resource ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Bundle identifier
    pub bundle_id: String,
}

/// Remote processing state of an uploaded build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingState {
    /// Still being processed
    Processing,
    /// Ready to attach to a version
    Valid,
    /// Rejected by processing
    Invalid,
    /// Processing crashed
    Failed,
    /// Missing or unrecognized state
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ProcessingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processing => "PROCESSING",
            Self::Valid => "VALID",
            Self::Invalid => "INVALID",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// An uploaded build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Build {
    /// Build resource ID
    pub id: String,
    /// Build number as uploaded
    pub version: String,
    /// Current processing state
    pub processing_state: ProcessingState,
    /// When the build was uploaded
    pub uploaded_date: Option<DateTime<Utc>>,
}

/// Review/release state of an App Store version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppStoreState {
    /// Editable, not yet submitted
    PrepareForSubmission,
    /// Ready to be submitted
    ReadyForReview,
    /// Submitted, queued for review
    WaitingForReview,
    /// Being reviewed
    InReview,
    /// Approved, waiting for the developer to release
    PendingDeveloperRelease,
    /// Live on the store
    ReadyForSale,
    /// Rejected by review
    Rejected,
    /// Metadata rejected by review
    MetadataRejected,
    /// Pulled back by the developer
    DeveloperRejected,
    /// Any other state
    #[serde(other)]
    Unknown,
}

impl AppStoreState {
    /// Whether the version has already gone to review (or past it)
    pub const fn is_submitted(self) -> bool {
        matches!(
            self,
            Self::WaitingForReview
                | Self::InReview
                | Self::PendingDeveloperRelease
                | Self::ReadyForSale
        )
    }
}

impl fmt::Display for AppStoreState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::PrepareForSubmission => "PREPARE_FOR_SUBMISSION",
            Self::ReadyForReview => "READY_FOR_REVIEW",
            Self::WaitingForReview => "WAITING_FOR_REVIEW",
            Self::InReview => "IN_REVIEW",
            Self::PendingDeveloperRelease => "PENDING_DEVELOPER_RELEASE",
            Self::ReadyForSale => "READY_FOR_SALE",
            Self::Rejected => "REJECTED",
            Self::MetadataRejected => "METADATA_REJECTED",
            Self::DeveloperRejected => "DEVELOPER_REJECTED",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// An App Store version (one release cycle)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppStoreVersion {
    /// Version resource ID
    pub id: String,
    /// Marketing version string
    pub version_string: String,
    /// Current state
    pub state: AppStoreState,
}

/// Per-locale metadata of a version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Localization {
    /// Localization resource ID
    pub id: String,
    /// Locale code, e.g. `en-US`
    pub locale: String,
    /// Current "What's New" text
    pub whats_new: Option<String>,
}

/// A review submission envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSubmission {
    /// Submission resource ID
    pub id: String,
}
