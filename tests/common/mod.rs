//! Common test utilities and helpers
//!
//! This module provides shared functionality for integration tests:
//! - Assertion helpers for robust comparisons
//! - Build record fixture creation utilities
//!
//! # Usage
//!
//! ```rust,no_run
//! mod common;
//! use common::fixtures::*;
//!
//! fn test_compare() {
//!     let workspace = Workspace::new().unwrap();
//!     let prev = workspace.write_build("prev.json", &build_json("prev", 1, &[("main", "a", 100.0)]));
//! }
//! ```

pub mod assertions;
pub mod fixtures;

/// Helper to get the build-tracker binary command
#[allow(dead_code)]
pub fn get_bin() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(env!("CARGO_BIN_EXE_build-tracker"));
    cmd.env_remove("RUST_LOG").arg("--no-color");
    cmd
}
