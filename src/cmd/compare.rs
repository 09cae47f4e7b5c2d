//! Compare command implementation
//!
//! Handles the `build-tracker compare` command which compares a base build
//! against a previous build and prints the per-artifact size changes

use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::options::{load_builds, load_single_build, ReportOptions, ResolvedOptions};
use crate::error::BuildTrackerError;
use crate::fmt::CHART;
use crate::report::ComparisonReport;
use crate::tracker::{BuildDelta, Comparator};

/// Compare two builds
///
/// Without `builds`, `base` and `prev` are record files holding one build
/// each. With `builds`, they are revisions looked up among the builds stored
/// in those files.
///
/// # Examples
///
/// ```no_run
/// use build_tracker::cmd::{cmd_compare, ReportOptions};
/// use std::path::Path;
///
/// cmd_compare("after.json", "before.json", &[], &ReportOptions::default(), Path::new("."))?;
/// # Ok::<(), anyhow::Error>(())
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - Either file doesn't exist or holds more than one build
/// - A revision is not among the loaded builds
/// - A filter fails to compile
pub fn cmd_compare(
    base: &str,
    prev: &str,
    builds: &[PathBuf],
    options: &ReportOptions,
    project_root: &Path,
) -> Result<()> {
    let resolved = options.resolve(project_root)?;
    let delta = if builds.is_empty() {
        compare_files(Path::new(base), Path::new(prev), &resolved)?
    } else {
        let comparator = Comparator::new(load_builds(builds)?);
        compare_revisions(&comparator, base, prev, &resolved)?
    };

    if resolved.is_interactive() {
        println!("{}{} Build Comparison", CHART, style("build-tracker").bold());
        println!();
    }
    print!("{}", render_comparison(&delta, &resolved)?);

    Ok(())
}

fn compare_files(base: &Path, prev: &Path, resolved: &ResolvedOptions) -> Result<Arc<BuildDelta>> {
    let comparator = Comparator::from_builds([load_single_build(prev)?, load_single_build(base)?]);
    comparator
        .delta(1, 0, &resolved.filters)
        .ok_or_else(|| anyhow::anyhow!("comparator lost its builds"))
}

/// Comparison between two revisions known to `comparator`
pub(crate) fn compare_revisions(
    comparator: &Comparator,
    base: &str,
    prev: &str,
    resolved: &ResolvedOptions,
) -> Result<Arc<BuildDelta>> {
    let base_index = revision_index(comparator, base)?;
    let prev_index = revision_index(comparator, prev)?;
    comparator
        .delta(base_index, prev_index, &resolved.filters)
        .ok_or_else(|| anyhow::anyhow!("comparator lost its builds"))
}

fn revision_index(comparator: &Comparator, revision: &str) -> Result<usize> {
    comparator.index_of(revision).ok_or_else(|| {
        BuildTrackerError::RevisionNotFound {
            revision: revision.to_string(),
            available: comparator
                .builds()
                .iter()
                .map(|b| b.revision().to_string())
                .collect(),
        }
        .into()
    })
}

/// Render one comparison, with the changed-artifact summary for text output
pub(crate) fn render_comparison(delta: &BuildDelta, resolved: &ResolvedOptions) -> Result<String> {
    let report = ComparisonReport::new(delta, &resolved.metric);
    let mut out = report.render(resolved.format)?;

    if resolved.is_interactive() {
        let changed = report.summary_lines();
        if changed.is_empty() {
            out.push_str(&format!("\n{}\n", style("No size changes").dim()));
        } else {
            out.push_str(&format!("\n{} artifact(s) changed:\n", changed.len()));
            for line in changed {
                out.push_str(&format!("  {}\n", line));
            }
        }
    }

    Ok(out)
}
