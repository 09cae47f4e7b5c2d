//! Immutable build snapshot

use super::artifact::{Artifact, ArtifactSizes};
use super::filters::ArtifactFilters;
use super::meta::{BuildMeta, MetaField};
use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

/// One build: its metadata and named artifacts
///
/// A `Build` owns copies of its inputs and exposes no mutators, so it is
/// immutable once constructed and safe to share behind an `Arc`.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::{Artifact, ArtifactFilters, Build, BuildMeta};
///
/// let build = Build::new(
///     BuildMeta::new("abc123", 1_700_000_000),
///     vec![
///         Artifact::new("main", "h1", [("gzip", 120.0)].into_iter().collect()),
///         Artifact::new("vendor", "h2", [("gzip", 50.0)].into_iter().collect()),
///     ],
/// );
///
/// assert_eq!(build.totals(&ArtifactFilters::none()).get("gzip"), Some(170.0));
///
/// let no_vendor = ArtifactFilters::new(["^vendor$"])?;
/// assert_eq!(build.totals(&no_vendor).get("gzip"), Some(120.0));
/// assert!(build.artifact("vendor").is_some());
/// # Ok::<(), build_tracker::tracker::FilterError>(())
/// ```
#[derive(Debug)]
pub struct Build {
    meta: BuildMeta,
    artifacts: Vec<Artifact>,
    index: HashMap<String, usize>,
    artifact_names: OnceLock<BTreeSet<String>>,
}

impl Build {
    /// Create a build from metadata and an ordered artifact list
    ///
    /// Artifact names are expected to be unique; ingestion validates this.
    pub fn new(meta: BuildMeta, artifacts: Vec<Artifact>) -> Self {
        let index = artifacts
            .iter()
            .enumerate()
            .map(|(i, artifact)| (artifact.name.clone(), i))
            .collect();
        Self {
            meta,
            artifacts,
            index,
            artifact_names: OnceLock::new(),
        }
    }

    /// Build metadata
    pub fn meta(&self) -> &BuildMeta {
        &self.meta
    }

    /// Revision value
    pub fn revision(&self) -> &str {
        self.meta.revision()
    }

    /// Unix epoch milliseconds
    pub fn timestamp(&self) -> u64 {
        self.meta.timestamp
    }

    /// Artifacts in their original order
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Number of artifacts
    pub fn artifact_count(&self) -> usize {
        self.artifacts.len()
    }

    /// Set of all artifact names (computed on first access)
    pub fn artifact_names(&self) -> &BTreeSet<String> {
        self.artifact_names
            .get_or_init(|| self.artifacts.iter().map(|a| a.name.clone()).collect())
    }

    /// Look up an artifact by name
    pub fn artifact(&self, name: &str) -> Option<&Artifact> {
        self.index.get(name).map(|&i| &self.artifacts[i])
    }

    /// Sum of every metric over the artifacts not excluded by `filters`
    ///
    /// The metric keys come from the first artifact of the build and start
    /// at zero, so a fully filtered build still reports every metric. A
    /// metric missing from a later artifact adds nothing. Computed on every
    /// call since callers pass differing filters.
    pub fn totals(&self, filters: &ArtifactFilters) -> ArtifactSizes {
        let Some(first) = self.artifacts.first() else {
            return ArtifactSizes::new();
        };

        let mut totals = first.sizes.zeroed();
        for artifact in self.artifacts.iter().filter(|a| !filters.excludes(&a.name)) {
            for (metric, total) in totals.iter_mut() {
                *total += artifact.sizes.get(metric).unwrap_or(0.0);
            }
        }
        totals
    }

    /// Raw metadata field
    pub fn meta_field(&self, key: &str) -> Option<&MetaField> {
        self.meta.field(key)
    }

    /// Displayable value of a metadata field
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta.value(key)
    }

    /// Hyperlink of a metadata field, if it is a linked field
    pub fn meta_url(&self, key: &str) -> Option<&str> {
        self.meta.url(key)
    }
}
