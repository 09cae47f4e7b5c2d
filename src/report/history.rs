//! Size history of one artifact or of build totals

use super::{csv_field, OutputFormat, RenderError};
use crate::fmt::{format_bytes, format_size_delta, truncate};
use crate::tracker::{ArtifactFilters, Comparator};
use serde::Serialize;
use std::fmt::{self, Write as _};

/// One build in a [`HistoryReport`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryPoint {
    /// Build revision
    pub revision: String,
    /// Build timestamp
    pub timestamp: u64,
    /// Artifact hash; always `None` for totals
    pub hash: Option<String>,
    /// Size for the metric, `None` where the build lacks the artifact
    pub size: Option<f64>,
}

/// History of one metric across every build, in build order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryReport {
    /// Artifact name, or `None` for filtered totals
    pub artifact: Option<String>,
    /// Metric the report covers
    pub metric: String,
    /// One point per build
    pub points: Vec<HistoryPoint>,
}

impl HistoryReport {
    /// History of artifact `name`
    pub fn for_artifact(comparator: &Comparator, name: &str, metric: &str) -> Self {
        let points = comparator
            .artifact_history(name)
            .into_iter()
            .map(|entry| HistoryPoint {
                size: entry.sizes.as_ref().and_then(|s| s.get(metric)),
                revision: entry.revision,
                timestamp: entry.timestamp,
                hash: entry.hash,
            })
            .collect();

        Self {
            artifact: Some(name.to_string()),
            metric: metric.to_string(),
            points,
        }
    }

    /// History of the filtered build totals
    pub fn for_totals(comparator: &Comparator, filters: &ArtifactFilters, metric: &str) -> Self {
        let points = comparator
            .total_history(filters)
            .into_iter()
            .map(|entry| HistoryPoint {
                size: entry.totals.get(metric),
                revision: entry.revision,
                timestamp: entry.timestamp,
                hash: None,
            })
            .collect();

        Self {
            artifact: None,
            metric: metric.to_string(),
            points,
        }
    }

    fn subject(&self) -> &str {
        self.artifact.as_deref().unwrap_or("total")
    }

    /// Change of each point against the closest earlier point with a size
    pub fn changes(&self) -> Vec<Option<f64>> {
        let mut last = None;
        self.points
            .iter()
            .map(|point| {
                let size = point.size?;
                let change = last.map(|previous| size - previous);
                last = Some(size);
                change
            })
            .collect()
    }

    /// Render in the requested format
    pub fn render(&self, format: OutputFormat) -> Result<String, RenderError> {
        Ok(match format {
            OutputFormat::Json => serde_json::to_string_pretty(self)?,
            OutputFormat::Text => self.to_text_table()?,
            OutputFormat::Markdown => self.to_markdown()?,
            OutputFormat::Csv => self.to_csv()?,
        })
    }

    fn to_text_table(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "{} history ({})", self.subject(), self.metric)?;
        writeln!(out, "{}", "=".repeat(80))?;
        writeln!(
            out,
            "{:<24} {:>12} {:<14} {:>12} {:>12}",
            "Revision", "Timestamp", "Hash", "Size", "Change"
        )?;
        writeln!(out, "{}", "-".repeat(80))?;
        for (point, change) in self.points.iter().zip(self.changes()) {
            writeln!(
                out,
                "{:<24} {:>12} {:<14} {:>12} {:>12}",
                truncate(&point.revision, 24),
                point.timestamp,
                truncate(point.hash.as_deref().unwrap_or("-"), 14),
                point.size.map_or_else(|| "-".to_string(), format_bytes),
                change.map_or_else(|| "-".to_string(), format_size_delta),
            )?;
        }
        writeln!(out, "{}", "=".repeat(80))?;
        Ok(out)
    }

    fn to_markdown(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        writeln!(out, "### {} history ({})\n", self.subject(), self.metric)?;
        writeln!(out, "| Revision | Timestamp | Hash | Size | Change |")?;
        writeln!(out, "| --- | ---: | --- | ---: | ---: |")?;
        for (point, change) in self.points.iter().zip(self.changes()) {
            writeln!(
                out,
                "| `{}` | {} | {} | {} | {} |",
                point.revision,
                point.timestamp,
                point.hash.as_deref().unwrap_or("-"),
                point.size.map_or_else(|| "-".to_string(), format_bytes),
                change.map_or_else(|| "-".to_string(), format_size_delta),
            )?;
        }
        Ok(out)
    }

    fn to_csv(&self) -> Result<String, fmt::Error> {
        let mut out = String::from("revision,timestamp,hash,size,change\n");
        for (point, change) in self.points.iter().zip(self.changes()) {
            writeln!(
                out,
                "{},{},{},{},{}",
                csv_field(&point.revision),
                point.timestamp,
                csv_field(point.hash.as_deref().unwrap_or_default()),
                point.size.map(|s| s.to_string()).unwrap_or_default(),
                change.map(|c| c.to_string()).unwrap_or_default(),
            )?;
        }
        Ok(out)
    }
}
