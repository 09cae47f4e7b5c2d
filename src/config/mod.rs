//! Configuration for build-tracker
//!
//! This module provides:
//! - .build-tracker.toml config file support
//! - Loading with defaults when the file is absent, and saving

pub mod file;
pub mod loader;

pub use file::{ConfigFile, RegressionSettings, CONFIG_FILE_NAME, DEFAULT_METRIC};
pub use loader::ConfigLoader;
