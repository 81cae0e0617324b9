//! CLI commands
//!
//! Command implementations for the `asc-submit` binary.

mod auth;
mod progress;
mod submit;
pub mod style;

pub use auth::report_error;
pub use submit::{run_submit, SubmitArgs};
