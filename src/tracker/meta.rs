//! Build metadata

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A metadata value: plain text, or a value with an optional hyperlink
///
/// In JSON a scalar may be a string, number or boolean; numbers and booleans
/// are kept in their textual form. A linked value is an object
/// `{"value": ..., "url": ...}`.
///
/// # Examples
///
/// ```
/// use build_tracker::tracker::MetaField;
///
/// let plain: MetaField = serde_json::from_str(r#""main""#)?;
/// assert_eq!(plain.value(), "main");
/// assert_eq!(plain.url(), None);
///
/// let linked: MetaField =
///     serde_json::from_str(r#"{"value": "abc123", "url": "https://example.com/c/abc123"}"#)?;
/// assert_eq!(linked.value(), "abc123");
/// assert_eq!(linked.url(), Some("https://example.com/c/abc123"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaField {
    /// Displayable value with an optional link
    Linked {
        /// Displayable value
        #[serde(deserialize_with = "scalar_text")]
        value: String,
        /// Hyperlink for the value
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },
    /// Plain displayable value
    Scalar(#[serde(deserialize_with = "scalar_text")] String),
}

impl MetaField {
    /// Create a linked field
    pub fn linked(value: impl Into<String>, url: impl Into<String>) -> Self {
        Self::Linked {
            value: value.into(),
            url: Some(url.into()),
        }
    }

    /// The displayable value
    pub fn value(&self) -> &str {
        match self {
            Self::Linked { value, .. } => value,
            Self::Scalar(value) => value,
        }
    }

    /// The hyperlink, if any
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Linked { url, .. } => url.as_deref(),
            Self::Scalar(_) => None,
        }
    }
}

impl From<&str> for MetaField {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }
}

impl From<String> for MetaField {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a string, number or boolean metadata value, got {}",
            other
        ))),
    }
}

/// A timestamp as producers write it: epoch milliseconds, possibly
/// fractional, or an RFC 3339 / `YYYY-MM-DD` date string
#[derive(Deserialize)]
#[serde(untagged)]
enum TimestampInput {
    Millis(u64),
    Fractional(f64),
    Text(String),
}

fn timestamp_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match TimestampInput::deserialize(deserializer)? {
        TimestampInput::Millis(millis) => Ok(millis),
        TimestampInput::Fractional(millis) if millis.is_finite() && millis >= 0.0 => {
            Ok(millis.trunc() as u64)
        }
        TimestampInput::Fractional(millis) => Err(D::Error::custom(format!(
            "timestamp must be a non-negative number of milliseconds, got {}",
            millis
        ))),
        TimestampInput::Text(text) => parse_timestamp(&text).ok_or_else(|| {
            D::Error::custom(format!(
                "invalid timestamp '{}', expected RFC 3339 or YYYY-MM-DD",
                text
            ))
        }),
    }
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (midnight UTC) into
/// epoch milliseconds
///
/// Dates before 1970 are rejected.
///
/// ```
/// use build_tracker::tracker::parse_timestamp;
///
/// assert_eq!(parse_timestamp("2019-01-01T00:00:00Z"), Some(1_546_300_800_000));
/// assert_eq!(parse_timestamp("2019-01-01"), Some(1_546_300_800_000));
/// assert_eq!(parse_timestamp("yesterday"), None);
/// ```
pub fn parse_timestamp(text: &str) -> Option<u64> {
    let text = text.trim();
    let millis = match DateTime::parse_from_rfc3339(text) {
        Ok(datetime) => datetime.timestamp_millis(),
        Err(_) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()?
            .and_hms_opt(0, 0, 0)?
            .and_utc()
            .timestamp_millis(),
    };
    u64::try_from(millis).ok()
}

/// Wire form of [`BuildMeta`]; extra fields set to `null` are dropped
#[derive(Deserialize)]
struct RawBuildMeta {
    revision: MetaField,
    #[serde(deserialize_with = "timestamp_millis")]
    timestamp: u64,
    #[serde(flatten)]
    fields: BTreeMap<String, Option<MetaField>>,
}

impl From<RawBuildMeta> for BuildMeta {
    fn from(raw: RawBuildMeta) -> Self {
        Self {
            revision: raw.revision,
            timestamp: raw.timestamp,
            fields: raw
                .fields
                .into_iter()
                .filter_map(|(key, value)| Some((key, value?)))
                .collect(),
        }
    }
}

/// Metadata of one build
///
/// `revision` and `timestamp` are required; every other key lands in
/// [`BuildMeta::fields`]. Extra keys whose value is `null` are treated as
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawBuildMeta")]
pub struct BuildMeta {
    /// Unique build identifier (e.g. commit hash)
    pub revision: MetaField,
    /// Unix epoch milliseconds, used for ordering
    ///
    /// Records may give it as an integer, a fractional number or a date
    /// string; see [`parse_timestamp`].
    pub timestamp: u64,
    /// Additional metadata fields (branch, author, ...)
    #[serde(flatten)]
    pub fields: BTreeMap<String, MetaField>,
}

impl BuildMeta {
    /// Create metadata with only a revision and timestamp
    pub fn new(revision: impl Into<MetaField>, timestamp: u64) -> Self {
        Self {
            revision: revision.into(),
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Add an extra metadata field
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<MetaField>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Revision value
    pub fn revision(&self) -> &str {
        self.revision.value()
    }

    /// Look up a field by key; `"revision"` resolves to the revision
    ///
    /// The timestamp is not a [`MetaField`] and is not returned here.
    pub fn field(&self, key: &str) -> Option<&MetaField> {
        if key == "revision" {
            Some(&self.revision)
        } else {
            self.fields.get(key)
        }
    }

    /// Displayable value of a field
    pub fn value(&self, key: &str) -> Option<&str> {
        self.field(key).map(MetaField::value)
    }

    /// Hyperlink of a field, if it has one
    pub fn url(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(MetaField::url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_deserializes_extra_fields() {
        let meta: BuildMeta = serde_json::from_str(
            r#"{
                "revision": {"value": "abc123", "url": "https://example.com/abc123"},
                "timestamp": 1700000000,
                "branch": "main",
                "pr": 42,
                "green": true
            }"#,
        )
        .unwrap();

        assert_eq!(meta.revision(), "abc123");
        assert_eq!(meta.url("revision"), Some("https://example.com/abc123"));
        assert_eq!(meta.timestamp, 1_700_000_000);
        assert_eq!(meta.value("branch"), Some("main"));
        assert_eq!(meta.value("pr"), Some("42"));
        assert_eq!(meta.value("green"), Some("true"));
        assert_eq!(meta.url("branch"), None);
        assert_eq!(meta.value("missing"), None);
    }

    #[test]
    fn test_null_extra_fields_are_absent() {
        let meta: BuildMeta = serde_json::from_str(
            r#"{"revision": "r1", "timestamp": 5, "branch": null, "pr": 7}"#,
        )
        .unwrap();
        assert_eq!(meta.value("branch"), None);
        assert_eq!(meta.value("pr"), Some("7"));
        assert_eq!(meta.fields.len(), 1);
    }

    #[test]
    fn test_null_revision_is_rejected() {
        let result: Result<BuildMeta, _> =
            serde_json::from_str(r#"{"revision": null, "timestamp": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_accepts_iso_string() {
        let meta: BuildMeta =
            serde_json::from_str(r#"{"revision": "r1", "timestamp": "2019-01-01T00:00:00Z"}"#)
                .unwrap();
        assert_eq!(meta.timestamp, 1_546_300_800_000);

        let offset: BuildMeta = serde_json::from_str(
            r#"{"revision": "r1", "timestamp": "2019-01-01T02:00:00+02:00"}"#,
        )
        .unwrap();
        assert_eq!(offset.timestamp, 1_546_300_800_000);
    }

    #[test]
    fn test_timestamp_accepts_fractional_millis() {
        let meta: BuildMeta =
            serde_json::from_str(r#"{"revision": "r1", "timestamp": 1546300800000.75}"#).unwrap();
        assert_eq!(meta.timestamp, 1_546_300_800_000);
    }

    #[test]
    fn test_timestamp_rejects_garbage_and_negatives() {
        for timestamp in [r#""not a date""#, "-5", "-1.5", r#""1960-01-01""#] {
            let json = format!(r#"{{"revision": "r1", "timestamp": {}}}"#, timestamp);
            let result: Result<BuildMeta, _> = serde_json::from_str(&json);
            assert!(result.is_err(), "accepted {}", timestamp);
        }
    }

    #[test]
    fn test_linked_field_without_url() {
        let field: MetaField = serde_json::from_str(r#"{"value": "v1"}"#).unwrap();
        assert_eq!(field.value(), "v1");
        assert_eq!(field.url(), None);
        assert!(matches!(field, MetaField::Linked { .. }));
    }

    #[test]
    fn test_object_without_value_is_rejected() {
        let result: Result<MetaField, _> = serde_json::from_str(r#"{"url": "https://x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_timestamp_is_not_a_meta_field() {
        let meta = BuildMeta::new("abc", 10);
        assert_eq!(meta.field("timestamp"), None);
    }

    #[test]
    fn test_meta_serializes_flat() {
        let meta = BuildMeta::new("abc", 10).with_field("branch", "main");
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["revision"], "abc");
        assert_eq!(json["branch"], "main");
        assert_eq!(json["timestamp"], 10);
    }
}
