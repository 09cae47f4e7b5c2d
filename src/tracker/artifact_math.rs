//! Size arithmetic between two artifact size maps
//!
//! Both functions are total: an absent size map or a missing metric never
//! fails, it maps to a defined number.

use super::artifact::ArtifactSizes;

fn value(sizes: &ArtifactSizes, metric: &str) -> f64 {
    sizes.get(metric).unwrap_or(0.0)
}

/// Absolute change of `metric` from `prev` to `base`
///
/// - both present: `base[metric] - prev[metric]`
/// - `base` absent (artifact removed): `-prev[metric]`
/// - `prev` absent (artifact added): `base[metric]`
/// - both absent: `0`
///
/// A metric missing from a present map reads as `0`.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::{delta, ArtifactSizes};
///
/// let base: ArtifactSizes = [("gzip", 120.0)].into_iter().collect();
/// let prev: ArtifactSizes = [("gzip", 100.0)].into_iter().collect();
///
/// assert_eq!(delta("gzip", Some(&base), Some(&prev)), 20.0);
/// assert_eq!(delta("gzip", None, Some(&prev)), -100.0);
/// assert_eq!(delta("gzip", Some(&base), None), 120.0);
/// ```
pub fn delta(metric: &str, base: Option<&ArtifactSizes>, prev: Option<&ArtifactSizes>) -> f64 {
    match (base, prev) {
        (Some(base), Some(prev)) => value(base, metric) - value(prev, metric),
        (Some(base), None) => value(base, metric),
        (None, Some(prev)) => -value(prev, metric),
        (None, None) => 0.0,
    }
}

/// Percent change of `metric` from `prev` to `base`
///
/// Returns `delta * 100 / prev[metric]`, or `0` when there is no baseline:
/// `prev` absent, `prev[metric]` missing, or `prev[metric] == 0`.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::{percent_delta, ArtifactSizes};
///
/// let base: ArtifactSizes = [("gzip", 120.0)].into_iter().collect();
/// let prev: ArtifactSizes = [("gzip", 100.0)].into_iter().collect();
/// let zero: ArtifactSizes = [("gzip", 0.0)].into_iter().collect();
///
/// assert_eq!(percent_delta("gzip", Some(&base), Some(&prev)), 20.0);
/// assert_eq!(percent_delta("gzip", Some(&base), Some(&zero)), 0.0);
/// assert_eq!(percent_delta("gzip", Some(&base), None), 0.0);
/// ```
pub fn percent_delta(
    metric: &str,
    base: Option<&ArtifactSizes>,
    prev: Option<&ArtifactSizes>,
) -> f64 {
    let Some(prev_sizes) = prev else {
        return 0.0;
    };
    match prev_sizes.get(metric) {
        Some(baseline) if baseline != 0.0 => delta(metric, base, prev) * 100.0 / baseline,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sizes(gzip: f64) -> ArtifactSizes {
        [("gzip", gzip)].into_iter().collect()
    }

    #[test]
    fn test_delta_both_present_subtracts() {
        assert_eq!(delta("gzip", Some(&sizes(120.0)), Some(&sizes(100.0))), 20.0);
        assert_eq!(delta("gzip", Some(&sizes(80.0)), Some(&sizes(100.0))), -20.0);
    }

    #[test]
    fn test_delta_removed_artifact_is_negative_previous() {
        assert_eq!(delta("gzip", None, Some(&sizes(100.0))), -100.0);
    }

    #[test]
    fn test_delta_added_artifact_is_base_size() {
        assert_eq!(delta("gzip", Some(&sizes(50.0)), None), 50.0);
    }

    #[test]
    fn test_delta_both_absent_is_zero() {
        assert_eq!(delta("gzip", None, None), 0.0);
        assert_eq!(percent_delta("gzip", None, None), 0.0);
    }

    #[test]
    fn test_delta_missing_metric_reads_as_zero() {
        let stat_only: ArtifactSizes = [("stat", 10.0)].into_iter().collect();
        assert_eq!(delta("gzip", Some(&sizes(30.0)), Some(&stat_only)), 30.0);
        assert_eq!(percent_delta("gzip", Some(&sizes(30.0)), Some(&stat_only)), 0.0);
    }

    #[test]
    fn test_percent_delta_zero_baseline_is_zero() {
        let result = percent_delta("gzip", Some(&sizes(10.0)), Some(&sizes(0.0)));
        assert_eq!(result, 0.0);
        assert!(result.is_finite());
    }

    #[test]
    fn test_percent_delta_removed_artifact_is_minus_hundred() {
        assert_eq!(percent_delta("gzip", None, Some(&sizes(40.0))), -100.0);
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        /// Property: delta is plain subtraction for present maps
        #[test]
        fn prop_delta_is_subtraction(base in 0u32..1_000_000, prev in 0u32..1_000_000) {
            let (base, prev) = (base as f64, prev as f64);
            prop_assert_eq!(delta("gzip", Some(&sizes(base)), Some(&sizes(prev))), base - prev);
            prop_assert_eq!(delta("gzip", None, Some(&sizes(prev))), -prev);
            prop_assert_eq!(delta("gzip", Some(&sizes(base)), None), base);
        }

        /// Property: percent delta is finite and matches the formula when a baseline exists
        #[test]
        fn prop_percent_delta_formula(base in 0u32..1_000_000, prev in 0u32..1_000_000) {
            let (base, prev) = (base as f64, prev as f64);
            let result = percent_delta("gzip", Some(&sizes(base)), Some(&sizes(prev)));
            prop_assert!(result.is_finite());
            if prev == 0.0 {
                prop_assert_eq!(result, 0.0);
            } else {
                prop_assert_eq!(result, (base - prev) * 100.0 / prev);
            }
            prop_assert_eq!(percent_delta("gzip", Some(&sizes(base)), None), 0.0);
        }
    }
}
