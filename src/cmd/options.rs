//! Report options shared by the comparison commands
//!
//! Command-line flags take precedence over `.build-tracker.toml`; artifact
//! filters from both sources are combined.

use anyhow::Result;
use clap::Args;
use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{ConfigFile, ConfigLoader};
use crate::error::BuildTrackerError;
use crate::ingest::BuildLoader;
use crate::report::{OutputFormat, RegressionCheck};
use crate::tracker::{ArtifactFilters, Build};

/// Flags controlling what a report covers and how it is printed
#[derive(Debug, Clone, Default, Args)]
pub struct ReportOptions {
    /// Exclude artifacts whose name matches this regex (repeatable)
    #[arg(short, long = "filter", value_name = "REGEX")]
    pub filters: Vec<String>,

    /// Size metric to report (default: config `default-metric`, else gzip)
    #[arg(short, long, value_name = "METRIC")]
    pub metric: Option<String>,

    /// Output format (default: config `format`, else text)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// [`ReportOptions`] merged with the project configuration
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    /// Config and command-line filters, config first
    pub filters: ArtifactFilters,
    /// Metric to report
    pub metric: String,
    /// Output format
    pub format: OutputFormat,
    /// Configuration the options were resolved against
    pub config: ConfigFile,
}

impl ReportOptions {
    /// Merge with `.build-tracker.toml` in `project_root`
    pub fn resolve(&self, project_root: &Path) -> Result<ResolvedOptions> {
        let config = ConfigLoader::load(project_root)?;
        self.resolve_with(config)
    }

    /// Merge with an already loaded config
    pub fn resolve_with(&self, config: ConfigFile) -> Result<ResolvedOptions> {
        let mut filters = config.filters().map_err(BuildTrackerError::from)?;
        filters.extend(ArtifactFilters::new(&self.filters).map_err(BuildTrackerError::from)?);

        let metric = self
            .metric
            .clone()
            .unwrap_or_else(|| config.default_metric.clone());
        let format = self.format.unwrap_or(config.format);

        debug!(
            "Reporting {} as {} with {} filter(s)",
            metric,
            format,
            filters.len()
        );

        Ok(ResolvedOptions {
            filters,
            metric,
            format,
            config,
        })
    }
}

impl ResolvedOptions {
    /// Regression check for this run
    ///
    /// A metric named in the `[regression]` table wins over the report
    /// metric.
    pub fn regression_check(&self) -> RegressionCheck {
        self.config.regression_check(&self.metric)
    }

    /// True when status lines should accompany the report
    pub fn is_interactive(&self) -> bool {
        self.format == OutputFormat::Text
    }
}

/// Load every build from `paths`, in order
pub fn load_builds(paths: &[PathBuf]) -> Result<Vec<Arc<Build>>> {
    Ok(BuildLoader::new()
        .load_all(paths)?
        .into_iter()
        .map(Arc::new)
        .collect())
}

/// Load the single build stored in `path`
pub fn load_single_build(path: &Path) -> Result<Build> {
    let mut builds = BuildLoader::new().load_builds(path)?;
    if builds.len() != 1 {
        return Err(BuildTrackerError::UnexpectedRecordCount {
            path: path.to_path_buf(),
            found: builds.len(),
        }
        .into());
    }
    Ok(builds.remove(0))
}
