//! Summary command implementation
//!
//! Handles the `build-tracker summary` command which walks a series of
//! builds, compares each against its predecessor and optionally fails on a
//! size regression

use anyhow::Result;
use console::style;
use log::info;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::options::{load_builds, ReportOptions, ResolvedOptions};
use crate::error::BuildTrackerError;
use crate::fmt::{format_percent, format_size_delta, CHART, CHECKMARK, WARNING};
use crate::report::{csv_field, ComparisonReport, OutputFormat, Regression};
use crate::tracker::{BuildDelta, Comparator};

/// Summarize consecutive builds
///
/// With `check`, exits with a regression error when any comparison's total
/// grew beyond the configured threshold.
///
/// # Errors
///
/// Returns an error if:
/// - Fewer than two builds were loaded
/// - Any record file is missing or invalid
/// - `check` is set and a regression was found
pub fn cmd_summary(
    files: &[PathBuf],
    options: &ReportOptions,
    check: bool,
    project_root: &Path,
) -> Result<()> {
    let resolved = options.resolve(project_root)?;
    let comparator = Comparator::new(load_builds(files)?);
    if comparator.len() < 2 {
        return Err(BuildTrackerError::NotEnoughBuilds {
            operation: "summary".to_string(),
            required: 2,
            found: comparator.len(),
        }
        .into());
    }

    let chain = comparator.sequential_deltas(&resolved.filters);
    info!("Summarizing {} comparison(s)", chain.len());

    if resolved.is_interactive() {
        println!(
            "{}{} Summary of {} builds",
            CHART,
            style("build-tracker").bold(),
            comparator.len()
        );
        println!();
    }
    print!("{}", render_summary(&chain, &resolved)?);

    if check {
        let check = resolved.regression_check();
        let regressions = check.check_all(&chain);
        report_regressions(&regressions, check.max_increase_percent())?;
    }

    Ok(())
}

/// Render a chain of comparisons in the resolved format
pub(crate) fn render_summary(chain: &[Arc<BuildDelta>], resolved: &ResolvedOptions) -> Result<String> {
    let reports: Vec<ComparisonReport> = chain
        .iter()
        .map(|delta| ComparisonReport::new(delta, &resolved.metric))
        .collect();

    let out = match resolved.format {
        OutputFormat::Json => serde_json::to_string_pretty(&reports)?,
        OutputFormat::Markdown => reports
            .iter()
            .map(ComparisonReport::to_markdown)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        OutputFormat::Csv => {
            let mut out = String::from("revision,against_revision,delta,percent\n");
            for report in &reports {
                writeln!(
                    out,
                    "{},{},{},{}",
                    csv_field(&report.revision),
                    csv_field(&report.against_revision),
                    report.total.delta.map(|d| d.to_string()).unwrap_or_default(),
                    report.total.percent.map(|p| p.to_string()).unwrap_or_default(),
                )?;
            }
            out
        }
        OutputFormat::Text => {
            let mut out = String::new();
            for report in &reports {
                writeln!(
                    out,
                    "{} vs {}: {} ({})",
                    style(&report.revision).bold(),
                    report.against_revision,
                    report
                        .total
                        .delta
                        .map_or_else(|| "-".to_string(), format_size_delta),
                    report
                        .total
                        .percent
                        .map_or_else(|| "-".to_string(), format_percent),
                )?;
                for line in report.summary_lines() {
                    writeln!(out, "  {}", line)?;
                }
            }
            out
        }
    };

    Ok(out)
}

fn report_regressions(regressions: &[Regression], threshold: f64) -> Result<()> {
    if regressions.is_empty() {
        eprintln!(
            "{}No size regressions above {:.2}%",
            CHECKMARK, threshold
        );
        return Ok(());
    }

    for regression in regressions {
        eprintln!(
            "{}{} grew {} ({}) against {} [{}]",
            WARNING,
            style(&regression.revision).yellow().bold(),
            format_size_delta(regression.delta),
            format_percent(regression.percent),
            regression.against_revision,
            regression.metric
        );
    }

    let worst_percent = regressions
        .iter()
        .map(|r| r.percent)
        .fold(f64::NEG_INFINITY, f64::max);
    Err(BuildTrackerError::RegressionDetected {
        count: regressions.len(),
        worst_percent,
        threshold,
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::tracker::{Artifact, Build, BuildMeta};

    fn chain() -> Vec<Arc<BuildDelta>> {
        let build = |revision: &str, timestamp: u64, gzip: f64| {
            Build::new(
                BuildMeta::new(revision, timestamp),
                vec![Artifact::new("main", revision, [("gzip", gzip)].into_iter().collect())],
            )
        };
        Comparator::from_builds([build("a", 1, 100.0), build("b", 2, 110.0), build("c", 3, 110.0)])
            .sequential_deltas(&crate::tracker::ArtifactFilters::none())
    }

    fn resolved(format: OutputFormat) -> ResolvedOptions {
        ReportOptions {
            format: Some(format),
            ..Default::default()
        }
        .resolve_with(ConfigFile::default())
        .unwrap()
    }

    #[test]
    fn test_text_summary_lists_each_comparison() {
        console::set_colors_enabled(false);
        let out = render_summary(&chain(), &resolved(OutputFormat::Text)).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "b vs a: +10 B (+10.00%)");
        assert_eq!(lines[1], "  main: +10 B (+10.00%)");
        assert_eq!(lines[2], "c vs b: 0 B (+0.00%)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_csv_summary_has_one_row_per_comparison() {
        let out = render_summary(&chain(), &resolved(OutputFormat::Csv)).unwrap();
        assert_eq!(
            out,
            "revision,against_revision,delta,percent\nb,a,10,10\nc,b,0,0\n"
        );
    }

    #[test]
    fn test_csv_summary_quotes_revisions() {
        let build = |revision: &str, timestamp: u64, gzip: f64| {
            Build::new(
                BuildMeta::new(revision, timestamp),
                vec![Artifact::new("main", "h", [("gzip", gzip)].into_iter().collect())],
            )
        };
        let chain = Comparator::from_builds([build("v1, rc", 1, 100.0), build("say \"hi\"", 2, 90.0)])
            .sequential_deltas(&crate::tracker::ArtifactFilters::none());
        let out = render_summary(&chain, &resolved(OutputFormat::Csv)).unwrap();
        assert_eq!(
            out.lines().nth(1),
            Some("\"say \"\"hi\"\"\",\"v1, rc\",-10,-10")
        );
    }

    #[test]
    fn test_json_summary_is_array() {
        let out = render_summary(&chain(), &resolved(OutputFormat::Json)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_regressions_become_error_with_worst_percent() {
        let check = resolved(OutputFormat::Text).regression_check();
        let regressions = check.check_all(&chain());
        assert_eq!(regressions.len(), 1);

        let err = report_regressions(&regressions, 5.0).unwrap_err();
        match err.downcast_ref::<BuildTrackerError>() {
            Some(BuildTrackerError::RegressionDetected {
                count,
                worst_percent,
                ..
            }) => {
                assert_eq!(*count, 1);
                assert_eq!(*worst_percent, 10.0);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_no_regressions_is_ok() {
        assert!(report_regressions(&[], 5.0).is_ok());
    }
}
