//! Size deltas between two builds

use super::artifact::ArtifactSizes;
use super::artifact_math::{delta, percent_delta};
use super::build::Build;
use super::filters::ArtifactFilters;
use super::meta::BuildMeta;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock};

/// Change of one artifact between the base and previous build
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactDelta {
    /// Artifact name
    pub name: String,
    /// True if the artifact is missing on either side or its hash changed
    pub hash_changed: bool,
    /// Absolute change per metric
    pub sizes: ArtifactSizes,
    /// Percent change per metric
    pub percents: ArtifactSizes,
}

/// Change of the summed artifact sizes between two builds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuildSizeDelta {
    /// Revision of the build compared against
    pub against_revision: String,
    /// Absolute change per metric
    pub sizes: ArtifactSizes,
    /// Percent change per metric
    pub percents: ArtifactSizes,
}

#[derive(Debug)]
struct ArtifactDeltas {
    ordered: Vec<ArtifactDelta>,
    by_name: HashMap<String, usize>,
}

/// Comparison of a base build against a previous build
///
/// Every derived value is computed on first access and cached for the
/// lifetime of the instance; repeated calls return the same reference.
/// Initialization goes through [`OnceLock`], so concurrent first access
/// computes once.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::{Artifact, ArtifactFilters, Build, BuildDelta, BuildMeta};
/// use std::sync::Arc;
///
/// let prev = Arc::new(Build::new(
///     BuildMeta::new("prev", 1),
///     vec![Artifact::new("main", "h1", [("gzip", 100.0)].into_iter().collect())],
/// ));
/// let base = Arc::new(Build::new(
///     BuildMeta::new("base", 2),
///     vec![Artifact::new("main", "h1", [("gzip", 120.0)].into_iter().collect())],
/// ));
///
/// let delta = BuildDelta::new(base, prev, ArtifactFilters::none());
/// let main = delta.artifact_delta("main").expect("main is compared");
/// assert!(!main.hash_changed);
/// assert_eq!(main.sizes.get("gzip"), Some(20.0));
/// assert_eq!(main.percents.get("gzip"), Some(20.0));
/// assert_eq!(delta.total_delta().against_revision, "prev");
/// ```
#[derive(Debug)]
pub struct BuildDelta {
    base: Arc<Build>,
    prev: Arc<Build>,
    filters: ArtifactFilters,
    artifact_names: OnceLock<BTreeSet<String>>,
    artifact_deltas: OnceLock<ArtifactDeltas>,
    total_delta: OnceLock<BuildSizeDelta>,
}

impl BuildDelta {
    /// Compare `base` against `prev`, ignoring artifacts matched by `filters`
    ///
    /// The two builds are assumed to share a metric set; this is not checked.
    pub fn new(base: Arc<Build>, prev: Arc<Build>, filters: ArtifactFilters) -> Self {
        Self {
            base,
            prev,
            filters,
            artifact_names: OnceLock::new(),
            artifact_deltas: OnceLock::new(),
            total_delta: OnceLock::new(),
        }
    }

    /// The base build
    pub fn base(&self) -> &Arc<Build> {
        &self.base
    }

    /// The build compared against
    pub fn prev(&self) -> &Arc<Build> {
        &self.prev
    }

    /// Filters applied to this comparison
    pub fn filters(&self) -> &ArtifactFilters {
        &self.filters
    }

    /// Metadata of the base build
    pub fn meta(&self) -> &BuildMeta {
        self.base.meta()
    }

    /// Timestamp of the base build
    pub fn timestamp(&self) -> u64 {
        self.base.timestamp()
    }

    /// Displayable value of a base build metadata field
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.base.meta_value(key)
    }

    /// Hyperlink of a base build metadata field
    pub fn meta_url(&self, key: &str) -> Option<&str> {
        self.base.meta_url(key)
    }

    /// Union of both builds' artifact names, minus filtered names
    pub fn artifact_names(&self) -> &BTreeSet<String> {
        self.artifact_names.get_or_init(|| {
            self.base
                .artifact_names()
                .iter()
                .chain(self.prev.artifact_names())
                .filter(|name| !self.filters.excludes(name))
                .cloned()
                .collect()
        })
    }

    /// Per-artifact deltas, ordered by artifact name
    pub fn artifact_deltas(&self) -> &[ArtifactDelta] {
        &self.computed_deltas().ordered
    }

    /// Delta of one artifact, or `None` if it is in neither build or filtered
    pub fn artifact_delta(&self, name: &str) -> Option<&ArtifactDelta> {
        let deltas = self.computed_deltas();
        deltas.by_name.get(name).map(|&i| &deltas.ordered[i])
    }

    /// Delta of the filtered totals of both builds
    pub fn total_delta(&self) -> &BuildSizeDelta {
        self.total_delta.get_or_init(|| {
            let base_totals = self.base.totals(&self.filters);
            let prev_totals = self.prev.totals(&self.filters);

            let mut sizes = ArtifactSizes::new();
            let mut percents = ArtifactSizes::new();
            for metric in base_totals.metrics() {
                sizes.insert(
                    metric,
                    delta(metric, Some(&base_totals), Some(&prev_totals)),
                );
                percents.insert(
                    metric,
                    percent_delta(metric, Some(&base_totals), Some(&prev_totals)),
                );
            }

            BuildSizeDelta {
                against_revision: self.prev.revision().to_string(),
                sizes,
                percents,
            }
        })
    }

    /// True if any compared artifact changed hash or size
    pub fn has_changes(&self) -> bool {
        self.artifact_deltas()
            .iter()
            .any(|d| d.hash_changed || !d.sizes.all_zero())
    }

    fn computed_deltas(&self) -> &ArtifactDeltas {
        self.artifact_deltas.get_or_init(|| {
            debug!(
                "Computing artifact deltas for {} against {}",
                self.base.revision(),
                self.prev.revision()
            );
            let ordered: Vec<ArtifactDelta> = self
                .artifact_names()
                .iter()
                .map(|name| self.compare_artifact(name))
                .collect();
            let by_name = ordered
                .iter()
                .enumerate()
                .map(|(i, d)| (d.name.clone(), i))
                .collect();
            ArtifactDeltas { ordered, by_name }
        })
    }

    fn compare_artifact(&self, name: &str) -> ArtifactDelta {
        let base = self.base.artifact(name);
        let prev = self.prev.artifact(name);

        let (sizes, percents) = match prev {
            // Metrics come from the previous artifact; base-only metrics are dropped.
            Some(prev_artifact) => {
                let base_sizes = base.map(|a| &a.sizes);
                let prev_sizes = Some(&prev_artifact.sizes);
                let mut sizes = ArtifactSizes::new();
                let mut percents = ArtifactSizes::new();
                for metric in prev_artifact.sizes.metrics() {
                    sizes.insert(metric, delta(metric, base_sizes, prev_sizes));
                    percents.insert(metric, percent_delta(metric, base_sizes, prev_sizes));
                }
                (sizes, percents)
            }
            None => match base {
                Some(base_artifact) => (
                    base_artifact.sizes.clone(),
                    base_artifact.sizes.zeroed(),
                ),
                None => (ArtifactSizes::new(), ArtifactSizes::new()),
            },
        };

        let hash_changed = match (base, prev) {
            (Some(base), Some(prev)) => base.hash != prev.hash,
            _ => true,
        };

        ArtifactDelta {
            name: name.to_string(),
            hash_changed,
            sizes,
            percents,
        }
    }
}
