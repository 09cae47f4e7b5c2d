//! History command implementation
//!
//! Handles the `build-tracker history` command which prints the size of one
//! artifact, or of the filtered totals, across a series of builds

use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};

use super::options::{load_builds, ReportOptions};
use crate::error::BuildTrackerError;
use crate::fmt::CHART;
use crate::report::HistoryReport;
use crate::tracker::{ArtifactFilters, Comparator};

/// Print size history across builds
///
/// With `artifact`, follows that artifact (filters do not apply); otherwise
/// follows the filtered build totals.
///
/// # Errors
///
/// Returns an error if a record file is missing or invalid, or if no build
/// contains `artifact`.
pub fn cmd_history(
    files: &[PathBuf],
    artifact: Option<&str>,
    options: &ReportOptions,
    project_root: &Path,
) -> Result<()> {
    let resolved = options.resolve(project_root)?;
    let comparator = Comparator::new(load_builds(files)?);
    let report = history_report(&comparator, artifact, &resolved.filters, &resolved.metric)?;

    if resolved.is_interactive() {
        println!(
            "{}{} History of {} builds",
            CHART,
            style("build-tracker").bold(),
            comparator.len()
        );
        println!();
    }
    print!("{}", report.render(resolved.format)?);

    Ok(())
}

pub(crate) fn history_report(
    comparator: &Comparator,
    artifact: Option<&str>,
    filters: &ArtifactFilters,
    metric: &str,
) -> Result<HistoryReport> {
    let Some(name) = artifact else {
        return Ok(HistoryReport::for_totals(comparator, filters, metric));
    };

    let known = comparator.artifact_names(&ArtifactFilters::none());
    if !known.contains(name) {
        return Err(BuildTrackerError::ArtifactNotFound {
            name: name.to_string(),
            available: known.into_iter().collect(),
        }
        .into());
    }

    Ok(HistoryReport::for_artifact(comparator, name, metric))
}
