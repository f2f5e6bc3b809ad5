use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::StorageError;

/// Identifier of a blob in the bucket.
///
/// Generated once per upload (UUIDv7, so ids sort by creation time) and shared
/// with the metadata record describing the blob.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlobId(Uuid);

impl BlobId {
    /// Generate a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Parse a hyphenated or simple UUID string.
    pub fn parse(s: &str) -> Result<Self, StorageError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| StorageError::InvalidId(format!("{s:?}: {e}")))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Return the last 2 hex characters (shard directory for filesystem layout).
    ///
    /// The leading characters of a v7 id encode its timestamp, so the tail is
    /// used to spread blobs evenly across shards.
    pub fn shard_prefix(&self) -> String {
        let simple = self.0.simple().to_string();
        simple[simple.len() - 2..].to_string()
    }
}

impl From<Uuid> for BlobId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<BlobId> for Uuid {
    fn from(id: BlobId) -> Self {
        id.0
    }
}

impl FromStr for BlobId {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Debug for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BlobId({})", self.0)
    }
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for BlobId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for BlobId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
