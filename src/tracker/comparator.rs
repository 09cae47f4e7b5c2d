//! Comparisons across an ordered set of builds

use super::artifact::ArtifactSizes;
use super::build::Build;
use super::build_delta::BuildDelta;
use super::filters::ArtifactFilters;
use log::debug;
use parking_lot::Mutex;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

type DeltaKey = (usize, usize, Vec<String>);

/// Size of one artifact in one build, as used for charting history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactHistoryEntry {
    /// Revision of the build
    pub revision: String,
    /// Timestamp of the build
    pub timestamp: u64,
    /// Artifact hash, `None` if the build lacks the artifact
    pub hash: Option<String>,
    /// Artifact sizes, `None` if the build lacks the artifact
    pub sizes: Option<ArtifactSizes>,
}

/// Filtered totals of one build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalHistoryEntry {
    /// Revision of the build
    pub revision: String,
    /// Timestamp of the build
    pub timestamp: u64,
    /// Summed sizes of the non-filtered artifacts
    pub totals: ArtifactSizes,
}

/// Ordered collection of builds with cached pairwise comparisons
///
/// Builds are kept in the order supplied (display order); nothing is
/// deduplicated or re-sorted. Every [`BuildDelta`] handed out is cached by
/// `(base, previous, filter patterns)`, so asking twice returns the same
/// `Arc`.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::{Artifact, ArtifactFilters, Build, BuildMeta, Comparator};
///
/// let comparator = Comparator::from_builds([
///     Build::new(
///         BuildMeta::new("first", 1),
///         vec![Artifact::new("main", "a", [("gzip", 100.0)].into_iter().collect())],
///     ),
///     Build::new(
///         BuildMeta::new("second", 2),
///         vec![Artifact::new("main", "b", [("gzip", 90.0)].into_iter().collect())],
///     ),
/// ]);
///
/// let delta = comparator
///     .delta_by_revision("second", "first", &ArtifactFilters::none())
///     .expect("both revisions are known");
/// assert_eq!(delta.total_delta().sizes.get("gzip"), Some(-10.0));
///
/// let series = comparator.artifact_series("main", "gzip");
/// assert_eq!(series, vec![Some(100.0), Some(90.0)]);
/// ```
#[derive(Debug, Default)]
pub struct Comparator {
    builds: Vec<Arc<Build>>,
    deltas: Mutex<HashMap<DeltaKey, Arc<BuildDelta>>>,
}

impl Comparator {
    /// Wrap shared builds in display order
    pub fn new(builds: Vec<Arc<Build>>) -> Self {
        Self {
            builds,
            deltas: Mutex::new(HashMap::new()),
        }
    }

    /// Wrap owned builds in display order
    pub fn from_builds(builds: impl IntoIterator<Item = Build>) -> Self {
        Self::new(builds.into_iter().map(Arc::new).collect())
    }

    /// All builds in order
    pub fn builds(&self) -> &[Arc<Build>] {
        &self.builds
    }

    /// Number of builds
    pub fn len(&self) -> usize {
        self.builds.len()
    }

    /// True when there are no builds
    pub fn is_empty(&self) -> bool {
        self.builds.is_empty()
    }

    /// Build at a position
    pub fn build(&self, index: usize) -> Option<&Arc<Build>> {
        self.builds.get(index)
    }

    /// Position of the first build with `revision`
    pub fn index_of(&self, revision: &str) -> Option<usize> {
        self.builds.iter().position(|b| b.revision() == revision)
    }

    /// First build with `revision`
    pub fn build_by_revision(&self, revision: &str) -> Option<&Arc<Build>> {
        self.index_of(revision).and_then(|i| self.build(i))
    }

    /// Comparison of the build at `base` against the build at `prev`
    ///
    /// Returns `None` when either index is out of range.
    pub fn delta(
        &self,
        base: usize,
        prev: usize,
        filters: &ArtifactFilters,
    ) -> Option<Arc<BuildDelta>> {
        let base_build = self.builds.get(base)?;
        let prev_build = self.builds.get(prev)?;

        let mut deltas = self.deltas.lock();
        let entry = deltas
            .entry((base, prev, filters.cache_key()))
            .or_insert_with(|| {
                debug!(
                    "Creating comparison of {} against {}",
                    base_build.revision(),
                    prev_build.revision()
                );
                Arc::new(BuildDelta::new(
                    Arc::clone(base_build),
                    Arc::clone(prev_build),
                    filters.clone(),
                ))
            });
        Some(Arc::clone(entry))
    }

    /// Comparison between two builds looked up by revision
    pub fn delta_by_revision(
        &self,
        base_revision: &str,
        prev_revision: &str,
        filters: &ArtifactFilters,
    ) -> Option<Arc<BuildDelta>> {
        let base = self.index_of(base_revision)?;
        let prev = self.index_of(prev_revision)?;
        self.delta(base, prev, filters)
    }

    /// Each build compared against the one before it
    ///
    /// Yields `len() - 1` comparisons (none for fewer than two builds). The
    /// artifact and total deltas are computed in parallel before returning.
    pub fn sequential_deltas(&self, filters: &ArtifactFilters) -> Vec<Arc<BuildDelta>> {
        (1..self.builds.len())
            .into_par_iter()
            .filter_map(|i| {
                let delta = self.delta(i, i - 1, filters)?;
                delta.artifact_deltas();
                delta.total_delta();
                Some(delta)
            })
            .collect()
    }

    /// Sorted union of artifact names across every build, minus filtered names
    pub fn artifact_names(&self, filters: &ArtifactFilters) -> BTreeSet<String> {
        self.builds
            .iter()
            .flat_map(|b| b.artifact_names().iter())
            .filter(|name| !filters.excludes(name))
            .cloned()
            .collect()
    }

    /// History of one artifact: one entry per build, in build order
    ///
    /// Builds lacking the artifact yield an entry with `sizes: None`, never
    /// a zero-sized placeholder.
    pub fn artifact_history(&self, name: &str) -> Vec<ArtifactHistoryEntry> {
        self.builds
            .iter()
            .map(|build| {
                let artifact = build.artifact(name);
                ArtifactHistoryEntry {
                    revision: build.revision().to_string(),
                    timestamp: build.timestamp(),
                    hash: artifact.map(|a| a.hash.clone()),
                    sizes: artifact.map(|a| a.sizes.clone()),
                }
            })
            .collect()
    }

    /// One metric of one artifact across all builds, `None` where absent
    pub fn artifact_series(&self, name: &str, metric: &str) -> Vec<Option<f64>> {
        self.builds
            .iter()
            .map(|build| build.artifact(name).and_then(|a| a.sizes.get(metric)))
            .collect()
    }

    /// Filtered totals of every build, in build order
    pub fn total_history(&self, filters: &ArtifactFilters) -> Vec<TotalHistoryEntry> {
        self.builds
            .iter()
            .map(|build| TotalHistoryEntry {
                revision: build.revision().to_string(),
                timestamp: build.timestamp(),
                totals: build.totals(filters),
            })
            .collect()
    }
}
