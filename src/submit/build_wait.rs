//! Waiting for remote build processing

use crate::api::AppStoreApi;
use crate::error::{Error, Result};
use crate::submit::ProgressCallback;
use crate::types::{Build, ProcessingState};
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Polling settings for the build wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Give up after this long
    pub timeout: Duration,
    /// Delay between polls
    pub poll_interval: Duration,
    /// How often to say we are still waiting for a build to appear
    pub heartbeat_interval: Duration,
    /// Number of recent builds fetched per poll
    pub page_size: u32,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60 * 60),
            poll_interval: Duration::from_secs(5),
            heartbeat_interval: Duration::from_secs(30),
            page_size: 5,
        }
    }
}

/// Wait until a build finishes processing
///
/// With `build_number`, polls the most recent builds until one with that
/// version appears; until the deadline its absence is not an error. Without
/// it, follows the newest build. Returns the build once it is `VALID`.
///
/// The loop never sleeps past the deadline. Once the deadline is reached a
/// final poll is made and the timeout error returned.
pub async fn wait_for_build(
    api: &dyn AppStoreApi,
    app_id: &str,
    build_number: Option<&str>,
    options: &WaitOptions,
    progress: &dyn ProgressCallback,
) -> Result<Build> {
    let started = Instant::now();
    let deadline = started + options.timeout;
    let mut next_heartbeat = started + options.heartbeat_interval;
    let mut last_seen: Option<(String, ProcessingState)> = None;

    loop {
        let builds = api.recent_builds(app_id, options.page_size).await?;
        let target = match build_number {
            Some(number) => builds.into_iter().find(|b| b.version == number),
            None => Some(
                builds
                    .into_iter()
                    .next()
                    .ok_or_else(|| Error::NoBuilds(app_id.to_string()))?,
            ),
        };

        let now = Instant::now();
        let waited = now.duration_since(started);

        if let Some(build) = target {
            let seen = (build.version.clone(), build.processing_state);
            if last_seen.as_ref() != Some(&seen) {
                progress.on_build_state(&build).await;
                last_seen = Some(seen);
            }

            match build.processing_state {
                ProcessingState::Valid => return Ok(build),
                ProcessingState::Invalid | ProcessingState::Failed => {
                    return Err(Error::BuildInvalid(build.version));
                }
                ProcessingState::Processing | ProcessingState::Unknown => {}
            }

            if now >= deadline {
                return Err(Error::BuildStillProcessing {
                    version: build.version,
                    waited,
                });
            }
        } else {
            let number = build_number.unwrap_or_default();

            if now >= deadline {
                return Err(Error::BuildNeverAppeared {
                    build_number: number.to_string(),
                    waited,
                });
            }

            if now >= next_heartbeat {
                progress
                    .on_message(&format!(
                        "Still waiting for build {number} to appear... ({}s elapsed)",
                        waited.as_secs()
                    ))
                    .await;
                next_heartbeat = now + options.heartbeat_interval;
            }
        }

        sleep(options.poll_interval.min(deadline.saturating_duration_since(now))).await;
    }
}
