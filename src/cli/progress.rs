//! CLI progress callback with styled output and a build-processing spinner

use crate::cli::style::{arrow, check, cross, spinner_style, Stylize};
use anstream::{eprintln, println};
use asc_submit::error::Error;
use asc_submit::submit::{LocaleStatus, Phase, ProgressCallback};
use asc_submit::types::{Build, ProcessingState};
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// CLI progress callback that prints to the terminal
///
/// While a build is processing a spinner is shown; every other line is
/// printed with the spinner suspended so output does not interleave.
pub struct CliProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    /// Create a progress printer
    pub const fn new() -> Self {
        Self {
            spinner: Mutex::new(None),
        }
    }

    fn emit(&self, print: impl FnOnce()) {
        let spinner = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        match spinner {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }

    fn set_spinner(&self, message: String) {
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        let pb = slot.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner().with_style(spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        pb.set_message(message);
    }

    fn clear_spinner(&self) {
        if let Some(pb) = self
            .spinner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            pb.finish_and_clear();
        }
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_phase(&self, phase: Phase) {
        self.clear_spinner();
        if phase == Phase::Complete {
            return;
        }
        println!();
        println!("{}...", phase.to_string().emphasis());
    }

    async fn on_build_state(&self, build: &Build) {
        let line = format!("Build {} - State: {}", build.version, build.processing_state);
        self.emit(|| println!("  {} {}", arrow(), line));
        if build.processing_state == ProcessingState::Processing {
            self.set_spinner(format!("Build {} processing", build.version));
        } else {
            self.clear_spinner();
        }
    }

    async fn on_locale(&self, locale: &str, status: LocaleStatus) {
        self.emit(|| match &status {
            LocaleStatus::Updated => {
                println!("  {} Added release notes for {}", check(), locale.accent());
            }
            LocaleStatus::WouldUpdate => {
                println!("  {} {}", locale.accent(), status.to_string().muted());
            }
            LocaleStatus::Failed(msg) => {
                eprintln!(
                    "  {} Failed to add release notes for {}: {}",
                    cross(),
                    locale.accent().for_stderr(),
                    msg.warn()
                );
            }
        });
    }

    async fn on_dry_run(&self, action: &str) {
        let line = format!("[DRY RUN] {action}");
        self.emit(|| println!("  {}", line.warn().for_stdout()));
    }

    async fn on_success(&self, message: &str) {
        self.emit(|| println!("  {} {}", check(), message));
    }

    async fn on_warning(&self, message: &str) {
        self.emit(|| eprintln!("  {}: {}", "warning".warn(), message));
    }

    async fn on_error(&self, err: &Error) {
        self.emit(|| eprintln!("  {}: {}", "error".error(), err));
    }

    async fn on_message(&self, message: &str) {
        self.emit(|| println!("  {}", message.muted()));
    }
}
