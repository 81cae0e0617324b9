//! Error types for asc-submit

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a release run
#[derive(Debug, Error)]
pub enum Error {
    /// One or more required environment variables are unset
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingCredentials(Vec<String>),

    /// The `.p8` key file does not exist
    #[error("P8 key file not found: {}", .0.display())]
    KeyFileNotFound(PathBuf),

    /// The key file exists but is not a usable EC private key
    #[error("invalid signing key {}: {reason}", path.display())]
    InvalidKey {
        /// Path of the rejected key
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// Positional version argument could not be parsed
    #[error("invalid version '{0}': expected X.Y.Z or X.Y.Z+BUILD")]
    InvalidVersion(String),

    /// Release notes file could not be read
    #[error("cannot read release notes from {}: {source}", path.display())]
    ReleaseNotesFile {
        /// File that was requested
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// No Xcode project under the given path
    #[error("could not find project.pbxproj under {}", .0.display())]
    ProjectNotFound(PathBuf),

    /// Project file had no usable `PRODUCT_BUNDLE_IDENTIFIER`
    #[error("could not parse bundle ID from {}", .0.display())]
    BundleIdNotFound(PathBuf),

    /// No app registered for the bundle id
    #[error("app not found with bundle ID: {0}")]
    AppNotFound(String),

    /// The app has no uploaded builds
    #[error("no builds found for app {0}")]
    NoBuilds(String),

    /// Build failed remote processing
    #[error("build {0} processing failed")]
    BuildInvalid(String),

    /// The requested build number never showed up
    #[error("build {build_number} never appeared after {}s", waited.as_secs())]
    BuildNeverAppeared {
        /// Build number that was awaited
        build_number: String,
        /// How long we waited
        waited: Duration,
    },

    /// The build was found but did not finish processing in time
    #[error("build {version} is still processing after {}s; run again later", waited.as_secs())]
    BuildStillProcessing {
        /// Build number of the processing build
        version: String,
        /// How long we waited
        waited: Duration,
    },

    /// The version has no localizations to update
    #[error("no localizations found for version {0}")]
    NoLocalizations(String),

    /// Every localization update failed
    #[error("failed to add release notes to any of {0} localizations")]
    ReleaseNotesFailed(usize),

    /// API returned an error status
    #[error("API error ({status}): {detail}")]
    Api {
        /// HTTP status code
        status: u16,
        /// First error detail from the response body
        detail: String,
    },

    /// Still rate limited after the allowed number of waits
    #[error("rate limited {0} times, giving up")]
    RateLimited(u32),

    /// Request failed on every attempt
    #[error("{method} {path} failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// HTTP method
        method: String,
        /// Request path
        path: String,
        /// Attempts made
        attempts: u32,
        /// Failure of the final attempt
        last: Box<Error>,
    },

    /// Response body did not have the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// JWT signing error
    #[error("failed to generate JWT token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// HTTP transport error
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this is a configuration problem the user has to fix locally
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingCredentials(_)
                | Self::KeyFileNotFound(_)
                | Self::InvalidKey { .. }
                | Self::InvalidVersion(_)
                | Self::ReleaseNotesFile { .. }
        )
    }
}
