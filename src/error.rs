//! Enhanced error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Proper exit codes for CI/CD
//!
//! # Examples
//!
//! ```no_run
//! use build_tracker::error::ErrorFormatter;
//! use build_tracker::ingest::BuildLoader;
//! use std::path::Path;
//!
//! match BuildLoader::new().load_builds(Path::new("builds.json")) {
//!     Ok(builds) => println!("Loaded {} builds", builds.len()),
//!     Err(e) => {
//!         eprint!("{}", ErrorFormatter::format(&e));
//!         std::process::exit(ErrorFormatter::exit_code(&e));
//!     }
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::ingest::IngestError;
use crate::tracker::FilterError;

/// Enhanced build-tracker errors with contextual suggestions
#[derive(Error, Debug)]
pub enum BuildTrackerError {
    /// Artifact filter failed to compile
    #[error(transparent)]
    Filter(#[from] FilterError),

    /// Build record violates the ingestion contract
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Build record file does not exist
    #[error("Build record file not found: {path}")]
    RecordNotFound {
        /// Path to the missing file
        path: PathBuf,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// A file expected to hold one build holds some other number
    #[error("Expected exactly one build in {path}, found {found}")]
    UnexpectedRecordCount {
        /// File that was read
        path: PathBuf,
        /// Number of records found
        found: usize,
    },

    /// No loaded build has the requested revision
    #[error("Revision not found: '{revision}'")]
    RevisionNotFound {
        /// Requested revision
        revision: String,
        /// Revisions that were loaded
        available: Vec<String>,
    },

    /// No loaded build contains the requested artifact
    #[error("Artifact not found in any build: '{name}'")]
    ArtifactNotFound {
        /// Requested artifact
        name: String,
        /// Artifact names that were found
        available: Vec<String>,
    },

    /// An operation needs more builds than were supplied
    #[error("{operation} needs at least {required} builds, got {found}")]
    NotEnoughBuilds {
        /// Operation that was attempted
        operation: String,
        /// Builds required
        required: usize,
        /// Builds supplied
        found: usize,
    },

    /// Total size grew beyond the configured threshold
    #[error("{count} size regression(s) detected (worst {worst_percent:+.2}%, limit {threshold:.2}%)")]
    RegressionDetected {
        /// Number of regressed comparisons
        count: usize,
        /// Largest percent increase
        worst_percent: f64,
        /// Configured limit
        threshold: f64,
    },

    /// Configuration file holds invalid settings
    #[error("Invalid configuration in {path}: {reason}")]
    InvalidConfig {
        /// Path to the config file
        path: PathBuf,
        /// What is wrong
        reason: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl BuildTrackerError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::error::BuildTrackerError;
    ///
    /// let error = BuildTrackerError::RevisionNotFound {
    ///     revision: "abc".to_string(),
    ///     available: vec!["def".to_string(), "123".to_string()],
    /// };
    ///
    /// let suggestion = error.suggestion().unwrap();
    /// assert!(suggestion.contains("def, 123"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Filter(e) => Some(format!(
                "Artifact filters are regular expressions; escape special characters in '{}'",
                e.pattern
            )),
            Self::Ingest(e) => Some(match e {
                IngestError::EmptyRevision => {
                    "Set meta.revision to the commit hash of the build".to_string()
                }
                IngestError::EmptyArtifactName { .. } => {
                    "Every artifact needs a non-empty name".to_string()
                }
                IngestError::DuplicateArtifact { .. } => {
                    "Artifact names must be unique within a build".to_string()
                }
                IngestError::InvalidSize { .. } => {
                    "Sizes must be finite, non-negative numbers".to_string()
                }
                IngestError::MetricMismatch { expected, .. } => {
                    format!("Report the same metrics for every artifact: {}", expected)
                }
            }),
            Self::RecordNotFound { path, .. } => Some(format!(
                "Check that {} exists and holds build records in JSON",
                path.display()
            )),
            Self::UnexpectedRecordCount { .. } => Some(
                "Pass one file per build, or use --builds with revisions to pick from a larger file"
                    .to_string(),
            ),
            Self::RevisionNotFound { available, .. } => {
                Some(format!("Available revisions: {}", available.join(", ")))
            }
            Self::ArtifactNotFound { available, .. } => {
                Some(format!("Known artifacts: {}", available.join(", ")))
            }
            Self::NotEnoughBuilds { .. } => {
                Some("Pass more build record files or files with more records".to_string())
            }
            Self::RegressionDetected { .. } => Some(
                "Inspect the comparison above, or raise [regression] max-increase-percent in .build-tracker.toml"
                    .to_string(),
            ),
            Self::InvalidConfig { path, .. } => {
                Some(format!("Fix or remove {}", path.display()))
            }
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes based on the error type, following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use build_tracker::error::BuildTrackerError;
    ///
    /// let error = BuildTrackerError::RegressionDetected {
    ///     count: 1,
    ///     worst_percent: 12.0,
    ///     threshold: 5.0,
    /// };
    ///
    /// assert_eq!(error.exit_code(), 1); // Generic error for CI failure
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Filter(_) => 64,                      // EX_USAGE
            Self::Ingest(_) => 65,                      // EX_DATAERR
            Self::RecordNotFound { .. } => 66,          // EX_NOINPUT
            Self::UnexpectedRecordCount { .. } => 65,   // EX_DATAERR
            Self::RevisionNotFound { .. } => 64,        // EX_USAGE
            Self::ArtifactNotFound { .. } => 64,        // EX_USAGE
            Self::NotEnoughBuilds { .. } => 66,         // EX_NOINPUT
            Self::RegressionDetected { .. } => 1,       // Generic error (CI should fail)
            Self::InvalidConfig { .. } => 78,           // EX_CONFIG
            Self::Io { .. } => 74,                      // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(suggestion) = Self::inspect(error, BuildTrackerError::suggestion).flatten() {
            output.push_str(&format!(
                "\n{} {}\n",
                style("help:").cyan().bold(),
                suggestion
            ));
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::inspect(error, BuildTrackerError::exit_code).unwrap_or(1)
    }

    /// Apply `f` to the first recognised error in the chain
    fn inspect<T>(error: &anyhow::Error, f: impl Fn(&BuildTrackerError) -> T) -> Option<T> {
        error.chain().find_map(|cause| {
            if let Some(e) = cause.downcast_ref::<BuildTrackerError>() {
                Some(f(e))
            } else if let Some(e) = cause.downcast_ref::<IngestError>() {
                Some(f(&BuildTrackerError::Ingest(e.clone())))
            } else {
                cause
                    .downcast_ref::<FilterError>()
                    .map(|e| f(&BuildTrackerError::Filter(e.clone())))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    fn plain(err: &anyhow::Error) -> String {
        console::set_colors_enabled(false);
        ErrorFormatter::format(err)
    }

    fn all_variants() -> Vec<BuildTrackerError> {
        vec![
            BuildTrackerError::Filter(crate::tracker::ArtifactFilters::new(["("]).unwrap_err()),
            BuildTrackerError::Ingest(IngestError::EmptyRevision),
            BuildTrackerError::RecordNotFound {
                path: PathBuf::from("builds.json"),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "test"),
            },
            BuildTrackerError::UnexpectedRecordCount {
                path: PathBuf::from("builds.json"),
                found: 3,
            },
            BuildTrackerError::RevisionNotFound {
                revision: "abc".to_string(),
                available: vec!["def".to_string()],
            },
            BuildTrackerError::ArtifactNotFound {
                name: "main".to_string(),
                available: vec!["vendor".to_string()],
            },
            BuildTrackerError::NotEnoughBuilds {
                operation: "summary".to_string(),
                required: 2,
                found: 1,
            },
            BuildTrackerError::RegressionDetected {
                count: 2,
                worst_percent: 12.5,
                threshold: 5.0,
            },
            BuildTrackerError::InvalidConfig {
                path: PathBuf::from(".build-tracker.toml"),
                reason: "bad".to_string(),
            },
            BuildTrackerError::Io {
                context: "test".to_string(),
                source: std::io::Error::other("test"),
            },
        ]
    }

    #[test]
    fn test_all_error_variants_have_exit_codes() {
        for err in all_variants() {
            let exit_code = err.exit_code();
            assert!(
                exit_code > 0,
                "Error {:?} should have non-zero exit code",
                err
            );
            assert!(exit_code < 256, "Exit code should fit in a byte");
        }
    }

    #[test]
    fn test_all_error_variants_have_suggestions() {
        for err in all_variants() {
            assert!(err.suggestion().is_some(), "{:?} lacks a suggestion", err);
        }
    }

    #[test]
    fn test_exit_codes_follow_conventions() {
        let variants = all_variants();
        assert_eq!(variants[0].exit_code(), 64);
        assert_eq!(variants[1].exit_code(), 65);
        assert_eq!(variants[2].exit_code(), 66);
        assert_eq!(variants[7].exit_code(), 1);
        assert_eq!(variants[9].exit_code(), 74);
    }

    #[test]
    fn test_regression_message_shows_worst_and_limit() {
        let msg = all_variants()[7].to_string();
        assert_eq!(
            msg,
            "2 size regression(s) detected (worst +12.50%, limit 5.00%)"
        );
    }

    #[test]
    fn test_metric_mismatch_suggestion_lists_expected_metrics() {
        let err = BuildTrackerError::Ingest(IngestError::MetricMismatch {
            name: "vendor".to_string(),
            expected: "gzip, stat".to_string(),
            found: "gzip".to_string(),
        });
        assert!(err.suggestion().unwrap().contains("gzip, stat"));
    }

    #[test]
    fn test_formatter_includes_chain_and_help() {
        let err = anyhow::Error::new(BuildTrackerError::NotEnoughBuilds {
            operation: "summary".to_string(),
            required: 2,
            found: 1,
        })
        .context("Failed to summarize builds");

        let formatted = plain(&err);
        assert!(formatted.starts_with("error: Failed to summarize builds"));
        assert!(formatted.contains("caused by: summary needs at least 2 builds, got 1"));
        assert!(formatted.contains("help: Pass more build record files"));
        assert_eq!(ErrorFormatter::exit_code(&err), 66);
    }

    #[test]
    fn test_formatter_recognises_wrapped_ingest_errors() {
        let err = Err::<(), _>(IngestError::EmptyRevision)
            .context("Invalid build record in build.json")
            .unwrap_err();
        assert_eq!(ErrorFormatter::exit_code(&err), 65);
        let formatted = plain(&err);
        assert!(formatted.contains("help: Set meta.revision"));
    }

    #[test]
    fn test_formatter_defaults_to_generic_exit_code() {
        let err = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&err), 1);
        assert!(!ErrorFormatter::format(&err).contains("help:"));
    }
}
