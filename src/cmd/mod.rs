//! Command handlers for build-tracker CLI
//!
//! This module contains all command implementations, organized by functionality.
//! Each submodule handles a specific CLI command.

pub mod compare;
pub mod completions;
pub mod history;
pub mod ingest;
pub mod options;
pub mod summary;

// Re-export command functions for convenient access
pub use compare::cmd_compare;
pub use completions::cmd_completions;
pub use history::cmd_history;
pub use ingest::cmd_ingest;
pub use options::{ReportOptions, ResolvedOptions};
pub use summary::cmd_summary;
