//! Test fixture helpers for creating build record files
//!
//! Provides utilities for writing realistic build records and project
//! configuration into a temporary workspace.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Re-export anyhow for convenience
pub use anyhow;

/// A temporary project directory holding build records and config
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create an empty workspace
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    /// Root of the workspace
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a JSON value (one record or an array of records) to `name`
    pub fn write_build(&self, name: &str, value: &Value) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
        path
    }

    /// Write raw text to `name`
    pub fn write_raw(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    /// Write `.build-tracker.toml`
    pub fn write_config(&self, contents: &str) -> PathBuf {
        self.write_raw(".build-tracker.toml", contents)
    }
}

/// A build record with gzip sizes and stat sizes four times larger
///
/// `artifacts` holds `(name, hash, gzip size)` triples.
pub fn build_json(revision: &str, timestamp: u64, artifacts: &[(&str, &str, f64)]) -> Value {
    let artifacts: Vec<Value> = artifacts
        .iter()
        .map(|(name, hash, gzip)| {
            json!({
                "name": name,
                "hash": hash,
                "sizes": { "gzip": gzip, "stat": gzip * 4.0 }
            })
        })
        .collect();

    json!({
        "meta": {
            "revision": { "value": revision, "url": format!("https://example.com/commit/{}", revision) },
            "timestamp": timestamp,
            "branch": "main"
        },
        "artifacts": artifacts
    })
}

/// The three-build series used across CLI tests
///
/// - `r1`: main 100, vendor 40
/// - `r2`: main 120 (new hash), vendor 40
/// - `r3`: main 120, runtime 10 (vendor removed)
pub fn series() -> Value {
    json!([
        build_json("r1", 100, &[("main", "m1", 100.0), ("vendor", "v1", 40.0)]),
        build_json("r2", 200, &[("main", "m2", 120.0), ("vendor", "v1", 40.0)]),
        build_json("r3", 300, &[("main", "m2", 120.0), ("runtime", "rt1", 10.0)]),
    ])
}
