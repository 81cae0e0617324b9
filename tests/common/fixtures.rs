//! Test data factories for asc-submit types
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use asc_submit::types::{App, AppStoreState, AppStoreVersion, Build, Localization, ProcessingState};
use chrono::Utc;
use std::path::PathBuf;

/// Key ID matching the bundled test key
pub const TEST_KEY_ID: &str = "TESTKEY01";

/// Issuer ID used with the bundled test key
pub const TEST_ISSUER_ID: &str = "69a6de7e-0000-47e3-e053-5b8c7c11a4d1";

/// Bundle ID used across tests
pub const TEST_BUNDLE_ID: &str = "com.example.app";

/// Path of the bundled EC private key
pub fn test_key_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/AuthKey_TESTKEY01.p8")
}

/// Create an app with default values
pub fn make_app() -> App {
    App {
        id: "1234567890123".to_string(),
        name: "Example".to_string(),
        bundle_id: TEST_BUNDLE_ID.to_string(),
    }
}

/// Create a build with the given number and state
pub fn make_build(number: &str, state: ProcessingState) -> Build {
    Build {
        id: format!("build-{number}"),
        version: number.to_string(),
        processing_state: state,
        uploaded_date: Some(Utc::now()),
    }
}

/// Create a version in the given state
pub fn make_version(version_string: &str, state: AppStoreState) -> AppStoreVersion {
    AppStoreVersion {
        id: format!("version-{version_string}"),
        version_string: version_string.to_string(),
        state,
    }
}

/// Create a localization; its ID is derived from the locale
pub fn make_localization(locale: &str) -> Localization {
    Localization {
        id: localization_id(locale),
        locale: locale.to_string(),
        whats_new: None,
    }
}

/// ID given to the localization for `locale`
pub fn localization_id(locale: &str) -> String {
    format!("loc-{locale}")
}
