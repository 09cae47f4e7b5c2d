//! Size regression detection

use crate::tracker::BuildDelta;
use serde::Serialize;
use std::sync::Arc;

/// Default tolerated total increase, in percent
pub const DEFAULT_MAX_INCREASE_PERCENT: f64 = 5.0;

/// A comparison whose total grew beyond the threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Regression {
    /// Revision that regressed
    pub revision: String,
    /// Revision it was compared against
    pub against_revision: String,
    /// Metric that regressed
    pub metric: String,
    /// Total size increase
    pub delta: f64,
    /// Total percent increase
    pub percent: f64,
}

/// Flags total increases above `max_increase_percent`
///
/// The comparison is strict: growing by exactly the threshold passes.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionCheck {
    metric: String,
    max_increase_percent: f64,
}

impl RegressionCheck {
    /// Check `metric` against `max_increase_percent`
    pub fn new(metric: impl Into<String>, max_increase_percent: f64) -> Self {
        Self {
            metric: metric.into(),
            max_increase_percent,
        }
    }

    /// Metric being checked
    pub fn metric(&self) -> &str {
        &self.metric
    }

    /// Tolerated increase in percent
    pub fn max_increase_percent(&self) -> f64 {
        self.max_increase_percent
    }

    /// The regression in `delta`, if its total grew too much
    pub fn check(&self, delta: &BuildDelta) -> Option<Regression> {
        let total = delta.total_delta();
        let percent = total.percents.get(&self.metric)?;
        if percent <= self.max_increase_percent {
            return None;
        }

        Some(Regression {
            revision: delta.meta().revision().to_string(),
            against_revision: total.against_revision.clone(),
            metric: self.metric.clone(),
            delta: total.sizes.get(&self.metric).unwrap_or_default(),
            percent,
        })
    }

    /// Every regression in a chain of comparisons, in order
    pub fn check_all(&self, deltas: &[Arc<BuildDelta>]) -> Vec<Regression> {
        deltas.iter().filter_map(|delta| self.check(delta)).collect()
    }
}

impl Default for RegressionCheck {
    fn default() -> Self {
        Self::new("gzip", DEFAULT_MAX_INCREASE_PERCENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::{Artifact, ArtifactFilters, Build, BuildMeta};

    fn delta(prev_gzip: f64, base_gzip: f64) -> Arc<BuildDelta> {
        let build = |revision: &str, timestamp, gzip: f64| {
            Arc::new(Build::new(
                BuildMeta::new(revision, timestamp),
                vec![Artifact::new("main", revision, [("gzip", gzip)].into_iter().collect())],
            ))
        };
        Arc::new(BuildDelta::new(
            build("base", 2, base_gzip),
            build("prev", 1, prev_gzip),
            ArtifactFilters::none(),
        ))
    }

    #[test]
    fn test_increase_over_threshold_is_regression() {
        let regression = RegressionCheck::default().check(&delta(100.0, 110.0)).unwrap();
        assert_eq!(regression.revision, "base");
        assert_eq!(regression.against_revision, "prev");
        assert_eq!(regression.delta, 10.0);
        assert_eq!(regression.percent, 10.0);
    }

    #[test]
    fn test_increase_at_threshold_passes() {
        assert!(RegressionCheck::default().check(&delta(100.0, 105.0)).is_none());
    }

    #[test]
    fn test_decrease_is_never_regression() {
        assert!(RegressionCheck::new("gzip", 0.0)
            .check(&delta(100.0, 50.0))
            .is_none());
    }

    #[test]
    fn test_zero_baseline_is_not_regression() {
        assert!(RegressionCheck::new("gzip", 0.0)
            .check(&delta(0.0, 50.0))
            .is_none());
    }

    #[test]
    fn test_unknown_metric_is_not_regression() {
        assert!(RegressionCheck::new("brotli", 0.0)
            .check(&delta(100.0, 500.0))
            .is_none());
    }

    #[test]
    fn test_check_all_keeps_chain_order() {
        let chain = vec![delta(100.0, 120.0), delta(100.0, 101.0), delta(10.0, 20.0)];
        let regressions = RegressionCheck::default().check_all(&chain);
        let percents: Vec<_> = regressions.iter().map(|r| r.percent).collect();
        assert_eq!(percents, vec![20.0, 100.0]);
    }
}
