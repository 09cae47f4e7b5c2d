//! Artifact records and their size metrics

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of metric name (e.g. `"stat"`, `"gzip"`) to a size value
///
/// The same shape carries raw sizes, size deltas and percent deltas, so
/// values are not restricted to be non-negative here. Ingestion enforces
/// non-negative raw sizes.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::ArtifactSizes;
///
/// let sizes: ArtifactSizes = [("gzip", 120.0), ("stat", 400.0)].into_iter().collect();
/// assert_eq!(sizes.get("gzip"), Some(120.0));
/// assert_eq!(sizes.get("brotli"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSizes(BTreeMap<String, f64>);

impl ArtifactSizes {
    /// Create an empty size map
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Value for a metric, if present
    pub fn get(&self, metric: &str) -> Option<f64> {
        self.0.get(metric).copied()
    }

    /// Set the value for a metric
    pub fn insert(&mut self, metric: impl Into<String>, value: f64) {
        self.0.insert(metric.into(), value);
    }

    /// Whether the metric is present
    pub fn contains(&self, metric: &str) -> bool {
        self.0.contains_key(metric)
    }

    /// Metric names in sorted order
    pub fn metrics(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// `(metric, value)` pairs in sorted metric order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut f64)> {
        self.0.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of metrics
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no metrics are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Same metric keys with every value set to zero
    pub fn zeroed(&self) -> Self {
        Self(self.0.keys().map(|k| (k.clone(), 0.0)).collect())
    }

    /// True when every value is exactly zero
    pub fn all_zero(&self) -> bool {
        self.0.values().all(|v| *v == 0.0)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for ArtifactSizes {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One named output unit of a build (e.g. a bundle file)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    /// Name, unique within a build and stable across builds
    pub name: String,
    /// Content fingerprint
    pub hash: String,
    /// Size per metric
    pub sizes: ArtifactSizes,
}

impl Artifact {
    /// Create a new artifact
    pub fn new(name: impl Into<String>, hash: impl Into<String>, sizes: ArtifactSizes) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            sizes,
        }
    }
}
