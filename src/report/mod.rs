//! Rendering comparisons for people and CI
//!
//! A [`ComparisonReport`] flattens one [`BuildDelta`](crate::tracker::BuildDelta)
//! for a single metric and renders it in any [`OutputFormat`].
//! [`HistoryReport`] follows one metric across every build and
//! [`RegressionCheck`] flags total increases above a threshold.

mod comparison;
mod history;
mod regression;

pub use comparison::{ComparisonReport, ReportRow, ReportTotal};
pub use history::{HistoryPoint, HistoryReport};
pub use regression::{Regression, RegressionCheck, DEFAULT_MAX_INCREASE_PERCENT};

pub(crate) use comparison::csv_field;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Failure while rendering a report
#[derive(Error, Debug)]
pub enum RenderError {
    /// Writing the text output failed
    #[error("failed to format report")]
    Format(#[from] fmt::Error),

    /// Serializing the JSON output failed
    #[error("failed to serialize report as JSON")]
    Json(#[from] serde_json::Error),
}

/// Output format for reports
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Fixed-width table for terminals
    #[default]
    Text,
    /// GitHub-flavored markdown table
    Markdown,
    /// Comma-separated values
    Csv,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Markdown => "markdown",
            Self::Csv => "csv",
            Self::Json => "json",
        };
        f.write_str(name)
    }
}
