//! Artifact name filters

use regex::Regex;
use thiserror::Error;

/// An artifact filter pattern failed to compile
#[derive(Error, Debug, Clone)]
#[error("invalid artifact filter '{pattern}': {source}")]
pub struct FilterError {
    /// The offending pattern
    pub pattern: String,
    /// Regex compilation error
    #[source]
    pub source: regex::Error,
}

/// Ordered list of patterns excluding artifacts by name
///
/// An artifact is excluded when its name matches at least one pattern.
/// Patterns are unanchored regular expressions, so `vendor` excludes
/// `vendor.js` as well as `lib/vendor`.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::ArtifactFilters;
///
/// let filters = ArtifactFilters::new(["^vendor", r"\.map$"])?;
/// assert!(filters.excludes("vendor.js"));
/// assert!(filters.excludes("main.js.map"));
/// assert!(!filters.excludes("main.js"));
/// # Ok::<(), build_tracker::tracker::FilterError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArtifactFilters {
    patterns: Vec<Regex>,
}

impl ArtifactFilters {
    /// Compile a list of patterns, failing on the first invalid one
    pub fn new<I, S>(patterns: I) -> Result<Self, FilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let pattern = p.as_ref();
                Regex::new(pattern).map_err(|source| FilterError {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// A filter list that excludes nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// True when `name` matches any pattern
    pub fn excludes(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    /// Source text of each pattern, in order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when there are no patterns
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Append the patterns of `other` after this list's patterns
    pub fn extend(&mut self, other: ArtifactFilters) {
        self.patterns.extend(other.patterns);
    }

    pub(crate) fn cache_key(&self) -> Vec<String> {
        self.patterns().map(str::to_string).collect()
    }
}
