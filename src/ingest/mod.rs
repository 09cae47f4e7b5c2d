//! Build ingestion
//!
//! Validates incoming [`BuildRecord`]s, locates the parent build through an
//! injected [`ParentLookup`] and hands the resulting [`Comparator`] to an
//! optional [`BuildInsertedHandler`].

mod loader;
mod parent;
mod record;

pub use loader::BuildLoader;
pub use parent::{HistoryParentLookup, ParentLookup};
pub use record::{BuildRecord, IngestError};

use crate::tracker::{Build, Comparator};
use anyhow::{Context, Result};
use log::{debug, info};
use std::sync::Arc;

/// Notified once a build has been accepted
pub trait BuildInsertedHandler {
    /// Called with a comparator over `[parent, build]`, or `[build]` alone
    fn build_inserted(&self, comparator: &Comparator) -> Result<()>;
}

impl<F> BuildInsertedHandler for F
where
    F: Fn(&Comparator) -> Result<()>,
{
    fn build_inserted(&self, comparator: &Comparator) -> Result<()> {
        self(comparator)
    }
}

/// Result of [`insert_build`]
#[derive(Debug)]
pub struct InsertOutcome {
    /// The accepted build
    pub build: Arc<Build>,
    /// Its parent, if one was found
    pub parent: Option<Arc<Build>>,
    /// Comparator over the parent (first) and the new build
    pub comparator: Comparator,
}

impl InsertOutcome {
    /// True when a parent build was found
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }
}

/// Accept a build record
///
/// Validates `record`, converts it into a [`Build`], asks `lookup` for its
/// parent and notifies `handler` with a comparator ordered parent first.
///
/// # Errors
///
/// Fails when the record is invalid, when the lookup fails, or when the
/// handler reports an error.
pub fn insert_build(
    record: BuildRecord,
    lookup: &dyn ParentLookup,
    handler: Option<&dyn BuildInsertedHandler>,
) -> Result<InsertOutcome> {
    let build = Arc::new(record.into_build()?);
    info!(
        "Accepted build {} with {} artifact(s)",
        build.revision(),
        build.artifact_count()
    );

    let parent = lookup
        .parent_build(&build)
        .with_context(|| format!("Failed to look up parent of build {}", build.revision()))?;

    let builds = match &parent {
        Some(parent) => {
            debug!("Parent of {} is {}", build.revision(), parent.revision());
            vec![Arc::clone(parent), Arc::clone(&build)]
        }
        None => {
            debug!("Build {} has no parent", build.revision());
            vec![Arc::clone(&build)]
        }
    };
    let comparator = Comparator::new(builds);

    if let Some(handler) = handler {
        handler.build_inserted(&comparator)?;
    }

    Ok(InsertOutcome {
        build,
        parent,
        comparator,
    })
}
