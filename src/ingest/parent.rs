//! Parent build lookup for newly ingested builds

use crate::tracker::Build;
use anyhow::Result;
use std::sync::Arc;

/// Finds the build a newly ingested build should be compared against
pub trait ParentLookup {
    /// The parent of `build`, or `None` when it has none
    fn parent_build(&self, build: &Build) -> Result<Option<Arc<Build>>>;
}

impl<F> ParentLookup for F
where
    F: Fn(&Build) -> Result<Option<Arc<Build>>>,
{
    fn parent_build(&self, build: &Build) -> Result<Option<Arc<Build>>> {
        self(build)
    }
}

/// Picks the parent from a set of previously known builds
///
/// The parent is the most recent build with a strictly earlier timestamp and
/// a different revision. Ties on timestamp go to the build listed last.
#[derive(Debug, Clone, Default)]
pub struct HistoryParentLookup {
    builds: Vec<Arc<Build>>,
}

impl HistoryParentLookup {
    /// Look up parents among `builds`
    pub fn new(builds: Vec<Arc<Build>>) -> Self {
        Self { builds }
    }

    /// Known builds
    pub fn builds(&self) -> &[Arc<Build>] {
        &self.builds
    }
}

impl ParentLookup for HistoryParentLookup {
    fn parent_build(&self, build: &Build) -> Result<Option<Arc<Build>>> {
        let parent = self
            .builds
            .iter()
            .filter(|candidate| {
                candidate.timestamp() < build.timestamp()
                    && candidate.revision() != build.revision()
            })
            .max_by_key(|candidate| candidate.timestamp())
            .cloned();
        Ok(parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::BuildMeta;

    fn build(revision: &str, timestamp: u64) -> Arc<Build> {
        Arc::new(Build::new(BuildMeta::new(revision, timestamp), vec![]))
    }

    #[test]
    fn test_parent_is_latest_earlier_build() {
        let lookup = HistoryParentLookup::new(vec![build("a", 10), build("c", 30), build("b", 20)]);
        let parent = lookup.parent_build(&build("d", 25)).unwrap().unwrap();
        assert_eq!(parent.revision(), "b");
    }

    #[test]
    fn test_same_revision_is_never_its_own_parent() {
        let lookup = HistoryParentLookup::new(vec![build("a", 10), build("d", 20)]);
        let parent = lookup.parent_build(&build("d", 25)).unwrap().unwrap();
        assert_eq!(parent.revision(), "a");
    }

    #[test]
    fn test_no_earlier_build_means_no_parent() {
        let lookup = HistoryParentLookup::new(vec![build("later", 50), build("same", 25)]);
        assert!(lookup.parent_build(&build("d", 25)).unwrap().is_none());
        assert!(HistoryParentLookup::default()
            .parent_build(&build("d", 25))
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_closure_acts_as_lookup() {
        let fixed = build("fixed", 1);
        let lookup = |_: &Build| -> Result<Option<Arc<Build>>> { Ok(Some(Arc::clone(&fixed))) };
        let parent = lookup.parent_build(&build("x", 2)).unwrap().unwrap();
        assert!(Arc::ptr_eq(&parent, &fixed));
    }
}
