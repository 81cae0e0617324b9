//! Release pipeline
//!
//! Runs the release stages in order, each gating the next:
//! 1. Find the app
//! 2. Wait for build processing
//! 3. Find or create the version, attach the build
//! 4. Push release notes to every localization
//! 5. Submit for review

mod build_wait;
mod notes;
mod pipeline;
mod progress;
mod review;
mod version;

pub use build_wait::{wait_for_build, WaitOptions};
pub use notes::{update_release_notes, NotesReport};
pub use pipeline::{find_app, run_release, ReleaseOutcome, ReleaseReport};
pub use progress::{LocaleStatus, NoopProgress, Phase, ProgressCallback};
pub use review::{submit_for_review, SubmissionOutcome};
pub use version::{get_or_create_version, link_build, VersionResolution};

/// Build ID reported in place of a real one during a dry run
pub const DRY_RUN_BUILD_ID: &str = "dry-run-build-id";

/// Version ID reported in place of a created version during a dry run
pub const DRY_RUN_VERSION_ID: &str = "dry-run-version-id";
