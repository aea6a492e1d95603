//! Object metadata as seen through the gateway.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

/// Content type used when the store does not report one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of a metadata query for a single object.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectStat {
    /// Size in bytes.
    pub size: u64,

    /// Content type (MIME type) if the store recorded one.
    pub content_type: Option<String>,

    /// Entity tag, unquoted.
    pub etag: Option<String>,

    /// Timestamp when object was last modified.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectStat {
    pub fn content_type_or_default(&self) -> &str {
        self.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE)
    }
}

/// One element of a bucket listing.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    /// Full object key.
    pub name: String,

    pub size: u64,

    #[serde(serialize_with = "serialize_millis")]
    pub last_modified: Option<DateTime<Utc>>,

    pub etag: Option<String>,
}

/// Renders timestamps as `2024-01-01T00:00:00.000Z`.
fn serialize_millis<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => serializer.serialize_none(),
    }
}
