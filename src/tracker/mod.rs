//! Build comparison engine
//!
//! Turns build snapshots into per-artifact and total size deltas:
//! - [`Build`]: immutable metadata plus named artifacts with size metrics
//! - [`BuildDelta`]: cached comparison of a base build against a previous one
//! - [`Comparator`]: ordered builds, cached pairwise comparisons and history
//!
//! Everything here works on in-memory values and performs no I/O.

mod artifact;
mod artifact_math;
mod build;
mod build_delta;
mod comparator;
mod filters;
mod meta;

pub use artifact::{Artifact, ArtifactSizes};
pub use artifact_math::{delta, percent_delta};
pub use build::Build;
pub use build_delta::{ArtifactDelta, BuildDelta, BuildSizeDelta};
pub use comparator::{ArtifactHistoryEntry, Comparator, TotalHistoryEntry};
pub use filters::{ArtifactFilters, FilterError};
pub use meta::{parse_timestamp, BuildMeta, MetaField};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_types_are_thread_safe() {
        assert_send_sync::<Build>();
        assert_send_sync::<BuildDelta>();
        assert_send_sync::<Comparator>();
        assert_send_sync::<ArtifactFilters>();
    }

    #[test]
    fn test_vendor_scenario_end_to_end() {
        let prev = Arc::new(Build::new(
            BuildMeta::new("prev", 1),
            vec![Artifact::new(
                "main",
                "h1",
                [("gzip", 100.0)].into_iter().collect(),
            )],
        ));
        let base = Arc::new(Build::new(
            BuildMeta::new("base", 2),
            vec![
                Artifact::new("main", "h1", [("gzip", 120.0)].into_iter().collect()),
                Artifact::new("vendor", "v1", [("gzip", 50.0)].into_iter().collect()),
            ],
        ));
        let delta = BuildDelta::new(Arc::clone(&base), prev, ArtifactFilters::none());

        let vendor = delta.artifact_delta("vendor").unwrap();
        assert!(vendor.hash_changed);
        assert_eq!(vendor.sizes.get("gzip"), Some(50.0));
        assert_eq!(vendor.percents.get("gzip"), Some(0.0));
        assert_eq!(delta.total_delta().sizes.get("gzip"), Some(70.0));

        let without_vendor = ArtifactFilters::new(["^vendor$"]).unwrap();
        assert_eq!(base.totals(&without_vendor).get("gzip"), Some(120.0));
        assert!(base.artifact("vendor").is_some());
    }
}
