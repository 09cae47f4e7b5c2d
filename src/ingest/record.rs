//! Incoming build records and their validation

use crate::tracker::{Artifact, Build, BuildMeta};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A build record violates the ingestion contract
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Revision is empty or whitespace
    #[error("build revision must not be empty")]
    EmptyRevision,

    /// An artifact has no name
    #[error("artifact #{index} in build {revision} has an empty name")]
    EmptyArtifactName {
        /// Position of the artifact in the record
        index: usize,
        /// Revision of the record
        revision: String,
    },

    /// Two artifacts share a name
    #[error("duplicate artifact '{name}' in build {revision}")]
    DuplicateArtifact {
        /// Repeated artifact name
        name: String,
        /// Revision of the record
        revision: String,
    },

    /// A size is negative, NaN or infinite
    #[error("artifact '{name}' has invalid {metric} size {value}")]
    InvalidSize {
        /// Artifact name
        name: String,
        /// Metric name
        metric: String,
        /// Rejected value
        value: f64,
    },

    /// An artifact's metrics differ from those of the first artifact
    #[error("artifact '{name}' reports metrics [{found}] but the build uses [{expected}]")]
    MetricMismatch {
        /// Artifact name
        name: String,
        /// Metrics of the first artifact
        expected: String,
        /// Metrics of this artifact
        found: String,
    },
}

/// One build as submitted for ingestion
///
/// ```json
/// {
///   "meta": { "revision": "abc123", "timestamp": 1700000000, "branch": "main" },
///   "artifacts": [ { "name": "main", "hash": "h1", "sizes": { "stat": 400, "gzip": 120 } } ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildRecord {
    /// Build metadata
    pub meta: BuildMeta,
    /// Artifacts in submission order
    #[serde(default)]
    pub artifacts: Vec<Artifact>,
}

impl BuildRecord {
    /// Check the record against the contract [`Build`] relies on
    ///
    /// # Errors
    ///
    /// Returns the first violation found: an empty revision, an unnamed or
    /// duplicated artifact, a negative or non-finite size, or an artifact
    /// whose metric names differ from the first artifact's.
    pub fn validate(&self) -> Result<(), IngestError> {
        let revision = self.meta.revision();
        if revision.trim().is_empty() {
            return Err(IngestError::EmptyRevision);
        }

        let expected_metrics = self.artifacts.first().map(|a| metric_list(a));
        let mut seen = HashSet::new();

        for (index, artifact) in self.artifacts.iter().enumerate() {
            if artifact.name.is_empty() {
                return Err(IngestError::EmptyArtifactName {
                    index,
                    revision: revision.to_string(),
                });
            }
            if !seen.insert(artifact.name.as_str()) {
                return Err(IngestError::DuplicateArtifact {
                    name: artifact.name.clone(),
                    revision: revision.to_string(),
                });
            }
            if let Some((metric, value)) = artifact
                .sizes
                .iter()
                .find(|(_, value)| !value.is_finite() || *value < 0.0)
            {
                return Err(IngestError::InvalidSize {
                    name: artifact.name.clone(),
                    metric: metric.to_string(),
                    value,
                });
            }
            if let Some(expected) = &expected_metrics {
                let found = metric_list(artifact);
                if &found != expected {
                    return Err(IngestError::MetricMismatch {
                        name: artifact.name.clone(),
                        expected: expected.clone(),
                        found,
                    });
                }
            }
        }

        Ok(())
    }

    /// Validate and convert into a [`Build`]
    pub fn into_build(self) -> Result<Build, IngestError> {
        self.validate()?;
        Ok(Build::new(self.meta, self.artifacts))
    }
}

fn metric_list(artifact: &Artifact) -> String {
    artifact.sizes.metrics().collect::<Vec<_>>().join(", ")
}
