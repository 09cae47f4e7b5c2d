//! Loading build records from JSON files

use super::record::BuildRecord;
use crate::error::BuildTrackerError;
use crate::infra::{FileSystem, RealFileSystem};
use crate::tracker::Build;
use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::io;
use std::path::Path;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecordFile {
    Many(Vec<BuildRecord>),
    One(Box<BuildRecord>),
}

/// Reads build record files
///
/// A file holds either a single record object or an array of records.
pub struct BuildLoader<FS: FileSystem = RealFileSystem> {
    fs: FS,
}

impl BuildLoader<RealFileSystem> {
    /// Create a loader backed by the real filesystem
    pub fn new() -> Self {
        Self::with_fs(RealFileSystem)
    }
}

impl Default for BuildLoader<RealFileSystem> {
    fn default() -> Self {
        Self::new()
    }
}

impl<FS: FileSystem> BuildLoader<FS> {
    /// Create a loader with a custom filesystem implementation
    pub fn with_fs(fs: FS) -> Self {
        Self { fs }
    }

    /// Read the records in `path` without validating them
    pub fn load_records(&self, path: &Path) -> Result<Vec<BuildRecord>> {
        let contents = match self.fs.read_to_string(path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == io::ErrorKind::NotFound => {
                return Err(BuildTrackerError::RecordNotFound {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
            Err(source) => {
                return Err(BuildTrackerError::Io {
                    context: format!("reading build records from {}", path.display()),
                    source,
                }
                .into());
            }
        };
        let file: RecordFile = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse build records in {}", path.display()))?;

        let records = match file {
            RecordFile::Many(records) => records,
            RecordFile::One(record) => vec![*record],
        };
        debug!("Loaded {} build record(s) from {}", records.len(), path.display());
        Ok(records)
    }

    /// Read and validate the records in `path`, in file order
    pub fn load_builds(&self, path: &Path) -> Result<Vec<Build>> {
        self.load_records(path)?
            .into_iter()
            .map(|record| {
                let revision = record.meta.revision().to_string();
                record.into_build().with_context(|| {
                    format!("Invalid build record {} in {}", revision, path.display())
                })
            })
            .collect()
    }

    /// Read and validate builds from several files, concatenated in order
    pub fn load_all<P: AsRef<Path>>(&self, paths: &[P]) -> Result<Vec<Build>> {
        let mut builds = Vec::new();
        for path in paths {
            builds.extend(self.load_builds(path.as_ref())?);
        }
        Ok(builds)
    }
}
