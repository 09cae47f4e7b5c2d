//! Configuration file data structures

use crate::report::{OutputFormat, RegressionCheck, DEFAULT_MAX_INCREASE_PERCENT};
use crate::tracker::{ArtifactFilters, FilterError};
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".build-tracker.toml";

/// Metric used when neither the command line nor the config names one
pub const DEFAULT_METRIC: &str = "gzip";

/// build-tracker configuration file structure
///
/// ```toml
/// artifact-filters = ["\\.map$", "^vendor"]
/// default-metric = "gzip"
/// format = "markdown"
///
/// [regression]
/// max-increase-percent = 2.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Regular expressions excluding artifacts by name
    #[serde(
        rename = "artifact-filters",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub artifact_filters: Vec<String>,

    /// Size metric reported by default
    #[serde(rename = "default-metric", default = "default_metric")]
    pub default_metric: String,

    /// Report output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Regression check settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regression: Option<RegressionSettings>,
}

fn default_metric() -> String {
    DEFAULT_METRIC.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            artifact_filters: Vec::new(),
            default_metric: default_metric(),
            format: OutputFormat::default(),
            regression: None,
        }
    }
}

/// Regression check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionSettings {
    /// Largest tolerated total increase, in percent
    #[serde(
        rename = "max-increase-percent",
        default = "default_max_increase_percent"
    )]
    pub max_increase_percent: f64,

    /// Metric to check (defaults to `default-metric`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
}

fn default_max_increase_percent() -> f64 {
    DEFAULT_MAX_INCREASE_PERCENT
}

impl Default for RegressionSettings {
    fn default() -> Self {
        Self {
            max_increase_percent: DEFAULT_MAX_INCREASE_PERCENT,
            metric: None,
        }
    }
}

impl ConfigFile {
    /// Compile the configured artifact filters
    pub fn filters(&self) -> Result<ArtifactFilters, FilterError> {
        ArtifactFilters::new(&self.artifact_filters)
    }

    /// Regression check described by this config
    ///
    /// Checks the `[regression]` metric if set, else `report_metric`.
    pub fn regression_check(&self, report_metric: &str) -> RegressionCheck {
        let settings = self.regression.clone().unwrap_or_default();
        let metric = settings
            .metric
            .unwrap_or_else(|| report_metric.to_string());
        RegressionCheck::new(metric, settings.max_increase_percent)
    }

    /// Validate filters, metric names and the regression threshold
    pub fn validate(&self) -> Result<()> {
        self.filters()?;

        if self.default_metric.trim().is_empty() {
            anyhow::bail!("default-metric cannot be empty");
        }

        if let Some(ref regression) = self.regression {
            if !regression.max_increase_percent.is_finite()
                || regression.max_increase_percent < 0.0
            {
                anyhow::bail!(
                    "max-increase-percent must be a non-negative number, got {}",
                    regression.max_increase_percent
                );
            }
            if regression
                .metric
                .as_deref()
                .is_some_and(|m| m.trim().is_empty())
            {
                anyhow::bail!("regression metric cannot be empty");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_uses_gzip_and_text() {
        let config = ConfigFile::default();
        assert_eq!(config.default_metric, "gzip");
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.filters().unwrap().is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_regression_check_falls_back_to_report_metric() {
        let check = ConfigFile::default().regression_check("stat");
        assert_eq!(check.metric(), "stat");
        assert_eq!(check.max_increase_percent(), 5.0);
    }

    #[test]
    fn test_regression_check_uses_configured_metric() {
        let config = ConfigFile {
            regression: Some(RegressionSettings {
                max_increase_percent: 1.5,
                metric: Some("brotli".to_string()),
            }),
            ..Default::default()
        };
        let check = config.regression_check("gzip");
        assert_eq!(check.metric(), "brotli");
        assert_eq!(check.max_increase_percent(), 1.5);
    }

    #[test]
    fn test_validate_rejects_bad_filter() {
        let config = ConfigFile {
            artifact_filters: vec!["[unclosed".to_string()],
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[unclosed"));
    }

    #[test]
    fn test_validate_rejects_negative_threshold() {
        let config = ConfigFile {
            regression: Some(RegressionSettings {
                max_increase_percent: -1.0,
                metric: None,
            }),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_metric() {
        let config = ConfigFile {
            default_metric: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
