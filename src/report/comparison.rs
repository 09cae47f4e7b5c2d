//! Per-metric comparison report

use super::{OutputFormat, RenderError};
use crate::fmt::{format_bytes, format_percent, format_size_delta, truncate};
use crate::tracker::BuildDelta;
use serde::Serialize;
use std::fmt::{self, Write as _};

const WIDTH: usize = 80;

/// One artifact in a [`ComparisonReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Artifact name
    pub name: String,
    /// Content hash differs, or the artifact was added or removed
    pub hash_changed: bool,
    /// Size in the previous build, `None` if the artifact was added
    pub previous: Option<f64>,
    /// Size in the base build, `None` if the artifact was removed
    pub current: Option<f64>,
    /// Size change, `None` when the previous artifact lacks the metric
    pub delta: Option<f64>,
    /// Percent change, `None` when the previous artifact lacks the metric
    pub percent: Option<f64>,
}

impl ReportRow {
    fn is_changed(&self) -> bool {
        self.delta.is_some_and(|d| d != 0.0)
    }
}

/// Filtered totals in a [`ComparisonReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTotal {
    /// Total of the previous build
    pub previous: Option<f64>,
    /// Total of the base build
    pub current: Option<f64>,
    /// Total change
    pub delta: Option<f64>,
    /// Total percent change
    pub percent: Option<f64>,
}

/// Comparison of two builds for a single size metric
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Revision of the base build
    pub revision: String,
    /// Revision of the previous build
    pub against_revision: String,
    /// Metric the report covers
    pub metric: String,
    /// Artifacts in name order
    pub rows: Vec<ReportRow>,
    /// Totals over the non-filtered artifacts
    pub total: ReportTotal,
}

impl ComparisonReport {
    /// Flatten `delta` for `metric`
    pub fn new(delta: &BuildDelta, metric: &str) -> Self {
        let rows = delta
            .artifact_deltas()
            .iter()
            .map(|artifact| ReportRow {
                name: artifact.name.clone(),
                hash_changed: artifact.hash_changed,
                previous: delta
                    .prev()
                    .artifact(&artifact.name)
                    .and_then(|a| a.sizes.get(metric)),
                current: delta
                    .base()
                    .artifact(&artifact.name)
                    .and_then(|a| a.sizes.get(metric)),
                delta: artifact.sizes.get(metric),
                percent: artifact.percents.get(metric),
            })
            .collect();

        let total_delta = delta.total_delta();
        let total = ReportTotal {
            previous: delta.prev().totals(delta.filters()).get(metric),
            current: delta.base().totals(delta.filters()).get(metric),
            delta: total_delta.sizes.get(metric),
            percent: total_delta.percents.get(metric),
        };

        Self {
            revision: delta.meta().revision().to_string(),
            against_revision: total_delta.against_revision.clone(),
            metric: metric.to_string(),
            rows,
            total,
        }
    }

    /// Artifacts whose size changed for this metric
    pub fn changed_rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.rows.iter().filter(|row| row.is_changed())
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String, RenderError> {
        Ok(match format {
            OutputFormat::Text => self.to_text_table()?,
            OutputFormat::Markdown => self.to_markdown()?,
            OutputFormat::Csv => self.to_csv()?,
            OutputFormat::Json => self.to_json()?,
        })
    }

    /// Fixed-width table; changed hashes are marked with `*`
    pub fn to_text_table(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(
            out,
            "{} vs {} ({})",
            self.revision, self.against_revision, self.metric
        )?;
        writeln!(out, "{}", "=".repeat(WIDTH))?;
        writeln!(
            out,
            "  {:<30} {:>12} {:>12} {:>12} {:>8}",
            "Artifact", "Previous", "Current", "Change", "Percent"
        )?;
        writeln!(out, "{}", "-".repeat(WIDTH))?;

        for row in &self.rows {
            let marker = if row.hash_changed { '*' } else { ' ' };
            writeln!(
                out,
                "{} {:<30} {:>12} {:>12} {:>12} {:>8}",
                marker,
                truncate(&row.name, 30),
                size_cell(row.previous),
                size_cell(row.current),
                delta_cell(row.delta),
                percent_cell(row.percent),
            )?;
        }

        writeln!(out, "{}", "-".repeat(WIDTH))?;
        writeln!(
            out,
            "  {:<30} {:>12} {:>12} {:>12} {:>8}",
            "Total",
            size_cell(self.total.previous),
            size_cell(self.total.current),
            delta_cell(self.total.delta),
            percent_cell(self.total.percent),
        )?;
        writeln!(out, "{}", "=".repeat(WIDTH))?;
        Ok(out)
    }

    /// Markdown table with a bold total row
    pub fn to_markdown(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(
            out,
            "### `{}` vs `{}` ({})\n",
            self.revision, self.against_revision, self.metric
        )?;
        writeln!(out, "| Artifact | Previous | Current | Change | Percent |")?;
        writeln!(out, "| --- | ---: | ---: | ---: | ---: |")?;
        for row in &self.rows {
            let name = if row.hash_changed {
                format!("{} *", escape_markdown(&row.name))
            } else {
                escape_markdown(&row.name)
            };
            writeln!(
                out,
                "| {} | {} | {} | {} | {} |",
                name,
                size_cell(row.previous),
                size_cell(row.current),
                delta_cell(row.delta),
                percent_cell(row.percent),
            )?;
        }
        writeln!(
            out,
            "| **Total** | **{}** | **{}** | **{}** | **{}** |",
            size_cell(self.total.previous),
            size_cell(self.total.current),
            delta_cell(self.total.delta),
            percent_cell(self.total.percent),
        )?;
        Ok(out)
    }

    /// CSV with raw numbers; missing values are empty fields
    pub fn to_csv(&self) -> Result<String, fmt::Error> {
        let mut out = String::from("artifact,hash_changed,previous,current,delta,percent\n");
        for row in &self.rows {
            writeln!(
                out,
                "{},{},{},{},{},{}",
                csv_field(&row.name),
                row.hash_changed,
                number_field(row.previous),
                number_field(row.current),
                number_field(row.delta),
                number_field(row.percent),
            )?;
        }
        writeln!(
            out,
            "TOTAL,,{},{},{},{}",
            number_field(self.total.previous),
            number_field(self.total.current),
            number_field(self.total.delta),
            number_field(self.total.percent),
        )?;
        Ok(out)
    }

    /// Pretty-printed JSON of the whole report
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// One line per changed artifact, e.g. `main: +20 B (+20.00%)`
    pub fn summary_lines(&self) -> Vec<String> {
        self.changed_rows()
            .map(|row| {
                format!(
                    "{}: {} ({})",
                    row.name,
                    delta_cell(row.delta),
                    percent_cell(row.percent)
                )
            })
            .collect()
    }
}

fn size_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_bytes)
}

fn delta_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_size_delta)
}

fn percent_cell(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), format_percent)
}

fn number_field(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub(crate) fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn escape_markdown(value: &str) -> String {
    value.replace('|', "\\|")
}
