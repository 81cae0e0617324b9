//! Shared test utilities

#![allow(dead_code, unused_imports)]

pub mod fixtures;
pub mod mock_api;

pub use fixtures::*;
pub use mock_api::{ApiCall, MockAppStore};
