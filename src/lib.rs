//! asc-submit - App Store Connect release automation
//!
//! Waits for an uploaded build to finish processing, attaches it to an App
//! Store version, sets release notes for every localization and submits the
//! version for review.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod project;
pub mod submit;
pub mod types;
