//! Ingest command implementation
//!
//! Handles the `build-tracker ingest` command which validates a new build
//! record, finds its parent among previously recorded builds and prints the
//! resulting comparison

use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};

use super::compare::render_comparison;
use super::options::{load_builds, ReportOptions, ResolvedOptions};
use crate::error::BuildTrackerError;
use crate::fmt::{CHECKMARK, INFO};
use crate::ingest::{insert_build, BuildInsertedHandler, BuildLoader, HistoryParentLookup};
use crate::tracker::Comparator;

/// Prints the comparison of a newly accepted build against its parent
struct ComparisonPrinter<'a> {
    options: &'a ResolvedOptions,
}

impl BuildInsertedHandler for ComparisonPrinter<'_> {
    fn build_inserted(&self, comparator: &Comparator) -> Result<()> {
        let Some(delta) = comparator.delta(1, 0, &self.options.filters) else {
            if self.options.is_interactive() {
                if let Some(build) = comparator.build(0) {
                    println!(
                        "{}No parent build for {}; nothing to compare",
                        INFO,
                        build.revision()
                    );
                }
            }
            return Ok(());
        };

        print!("{}", render_comparison(&delta, self.options)?);
        Ok(())
    }
}

/// Ingest one build record
///
/// # Errors
///
/// Returns an error if:
/// - The record file is missing, malformed or holds more than one build
/// - The record fails validation
/// - A history file is missing or invalid
pub fn cmd_ingest(
    record: &Path,
    history: &[PathBuf],
    options: &ReportOptions,
    project_root: &Path,
) -> Result<()> {
    let resolved = options.resolve(project_root)?;

    let mut records = BuildLoader::new().load_records(record)?;
    if records.len() != 1 {
        return Err(BuildTrackerError::UnexpectedRecordCount {
            path: record.to_path_buf(),
            found: records.len(),
        }
        .into());
    }
    let record = records.remove(0);

    let lookup = HistoryParentLookup::new(load_builds(history)?);
    let printer = ComparisonPrinter { options: &resolved };
    let outcome = insert_build(record, &lookup, Some(&printer))?;

    if resolved.is_interactive() {
        println!(
            "\n{}Accepted build {} ({} artifacts)",
            CHECKMARK,
            style(outcome.build.revision()).bold(),
            outcome.build.artifact_count()
        );
    }

    Ok(())
}
