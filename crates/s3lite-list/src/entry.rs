//! Per-key metadata and the object summaries a listing returns.

use chrono::{DateTime, Utc};
use s3lite_core::CanonicalUser;
use serde::{Deserialize, Serialize};

/// Metadata a storage backend keeps for one object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMetadata {
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time, in milliseconds since the Unix epoch.
    pub last_modified_millis: i64,
    /// Entity tag, quoted as it appears on the wire.
    pub etag: String,
    /// Object owner.
    pub owner: CanonicalUser,
}

/// A key and its metadata, as yielded by a [`KeySource`](crate::KeySource).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    /// Object key.
    pub key: String,
    /// Object metadata.
    pub metadata: ObjectMetadata,
}

impl ListEntry {
    /// Pair a key with its metadata.
    pub fn new(key: impl Into<String>, metadata: ObjectMetadata) -> Self {
        Self {
            key: key.into(),
            metadata,
        }
    }
}

/// One `Contents` entry of a listing result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSummary {
    /// Object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time.
    pub last_modified: DateTime<Utc>,
    /// Entity tag.
    pub etag: String,
    /// Object owner.
    pub owner: CanonicalUser,
}

impl From<ListEntry> for ObjectSummary {
    fn from(entry: ListEntry) -> Self {
        let ListEntry { key, metadata } = entry;
        Self {
            key,
            size: metadata.size,
            last_modified: DateTime::from_timestamp_millis(metadata.last_modified_millis)
                .unwrap_or_default(),
            etag: metadata.etag,
            owner: metadata.owner,
        }
    }
}
