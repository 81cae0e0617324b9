//! Run configuration
//!
//! Built once at startup and passed by reference to every stage.

use crate::api::RetryPolicy;
use crate::auth::Credentials;
use crate::error::Result;
use crate::submit::WaitOptions;
use crate::types::Platform;
use std::time::Duration;

/// Production API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.appstoreconnect.apple.com/v1";

/// Environment variable overriding the API base URL
pub const ENV_BASE_URL: &str = "APP_STORE_CONNECT_API_URL";

/// Release notes used when none are given
pub const DEFAULT_RELEASE_NOTES: &str = "Bug fixes and improvements.";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the App Store Connect API
#[derive(Debug, Clone)]
pub struct Config {
    /// API key credentials
    pub credentials: Credentials,
    /// Base URL, without a trailing slash
    pub base_url: String,
    /// Timeout for a single HTTP request
    pub request_timeout: Duration,
    /// Retry behavior for failed requests
    pub retry: RetryPolicy,
}

impl Config {
    /// Build configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration through a variable lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let credentials = Credentials::from_lookup(&lookup)?;
        let base_url = lookup(ENV_BASE_URL)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(Self::new(credentials, &base_url))
    }

    /// Configuration with default timeout and retry policy
    pub fn new(credentials: Credentials, base_url: &str) -> Self {
        Self {
            credentials,
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
        }
    }
}

/// What to release and how
#[derive(Debug, Clone)]
pub struct ReleaseOptions {
    /// Report mutating calls instead of making them
    pub dry_run: bool,
    /// Platform of the version
    pub platform: Platform,
    /// "What's New" text for every localization
    pub release_notes: String,
    /// Build-processing wait settings
    pub wait: WaitOptions,
}

impl Default for ReleaseOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            platform: Platform::default(),
            release_notes: DEFAULT_RELEASE_NOTES.to_string(),
            wait: WaitOptions::default(),
        }
    }
}
