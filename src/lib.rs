#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! build-tracker library
//!
//! This library provides the build comparison engine behind the
//! `build-tracker` CLI: builds made of named artifacts with size metrics,
//! cached build-to-build deltas and artifact histories. It can be used
//! programmatically in addition to the CLI interface.
//!
//! # Basic Example
//!
//! Comparing two builds:
//!
//! ```
//! use build_tracker::tracker::{Artifact, ArtifactFilters, Build, BuildDelta, BuildMeta};
//! use std::sync::Arc;
//!
//! let prev = Arc::new(Build::new(
//!     BuildMeta::new("1a2b3c", 1_700_000_000),
//!     vec![Artifact::new("main", "aaa", [("gzip", 100.0), ("stat", 400.0)].into_iter().collect())],
//! ));
//! let base = Arc::new(Build::new(
//!     BuildMeta::new("4d5e6f", 1_700_000_600),
//!     vec![Artifact::new("main", "bbb", [("gzip", 120.0), ("stat", 480.0)].into_iter().collect())],
//! ));
//!
//! let delta = BuildDelta::new(base, prev, ArtifactFilters::none());
//! let main = delta.artifact_delta("main").unwrap();
//! assert!(main.hash_changed);
//! assert_eq!(main.sizes.get("gzip"), Some(20.0));
//! assert_eq!(main.percents.get("gzip"), Some(20.0));
//! assert_eq!(delta.total_delta().against_revision, "1a2b3c");
//! ```
//!
//! # Advanced Example: Ingesting Records
//!
//! Validating a JSON build record and comparing it against its parent:
//!
//! ```
//! use build_tracker::ingest::{insert_build, BuildRecord, HistoryParentLookup};
//! use build_tracker::report::ComparisonReport;
//! use build_tracker::tracker::ArtifactFilters;
//! use std::sync::Arc;
//!
//! let parent: BuildRecord = serde_json::from_str(r#"{
//!     "meta": {"revision": "parent", "timestamp": 1},
//!     "artifacts": [{"name": "main", "hash": "a", "sizes": {"gzip": 100}}]
//! }"#)?;
//! let record: BuildRecord = serde_json::from_str(r#"{
//!     "meta": {"revision": "child", "timestamp": 2, "branch": {"value": "main", "url": "https://example.com/main"}},
//!     "artifacts": [{"name": "main", "hash": "b", "sizes": {"gzip": 90}}]
//! }"#)?;
//!
//! let lookup = HistoryParentLookup::new(vec![Arc::new(parent.into_build()?)]);
//! let outcome = insert_build(record, &lookup, None)?;
//! assert_eq!(outcome.build.meta_url("branch"), Some("https://example.com/main"));
//!
//! let delta = outcome.comparator.delta(1, 0, &ArtifactFilters::none()).unwrap();
//! let report = ComparisonReport::new(&delta, "gzip");
//! assert_eq!(report.summary_lines(), vec!["main: -10 B (-10.00%)"]);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file management
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem access
pub mod infra;
/// Build record validation, loading and parent lookup
pub mod ingest;
/// Comparison, history and regression reports
pub mod report;
/// Build comparison engine
pub mod tracker;
