use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Zero-based index of a partition within a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionId(u32);

impl PartitionId {
    /// Creates a partition id from a raw index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw partition index.
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PartitionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PartitionId {
    fn from(index: u32) -> Self {
        Self(index)
    }
}

/// Position of a record within a partition.
///
/// Offsets start at 0 and increase by 1 per appended record. A
/// compacted partition may contain gaps; the offset of a surviving
/// record never changes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Offset(i64);

impl Offset {
    /// Creates an offset from a raw value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the offset of the first record in a partition.
    pub fn zero() -> Self {
        Self(0)
    }

    /// Returns the next offset.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw offset value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Offset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Offset {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Offset> for i64 {
    fn from(offset: Offset) -> Self {
        offset.0
    }
}

/// A record as consumed from a channel.
///
/// The key and value are carried as JSON; typed decoding happens at the
/// consumer boundary so that a malformed value can be detected, logged
/// and skipped without poisoning the partition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// Partitioning key, if the record was published keyed.
    pub key: Option<serde_json::Value>,

    /// The record payload.
    pub value: serde_json::Value,

    /// Partition the broker assigned this record to.
    pub partition: PartitionId,

    /// Position within the partition.
    pub offset: Offset,

    /// Broker-assigned append timestamp.
    pub timestamp: DateTime<Utc>,
}

impl Record {
    /// Decodes the record key into a typed value.
    pub fn key_as<K: serde::de::DeserializeOwned>(&self) -> Option<K> {
        self.key
            .as_ref()
            .and_then(|k| serde_json::from_value(k.clone()).ok())
    }

    /// Decodes the record value into a typed value.
    pub fn value_as<V: serde::de::DeserializeOwned>(&self) -> Result<V, serde_json::Error> {
        serde_json::from_value(self.value.clone())
    }
}

/// A record handed to the broker for publishing.
///
/// Partition and offset are assigned by the broker on append.
#[derive(Debug, Clone)]
pub struct ProducerRecord {
    /// Partitioning key. Keyed records with equal keys land on the same
    /// partition; unkeyed records are spread round-robin.
    pub key: Option<serde_json::Value>,

    /// The record payload.
    pub value: serde_json::Value,
}

impl ProducerRecord {
    /// Creates a keyed record from serializable key and value.
    pub fn keyed<K: Serialize, V: Serialize>(
        key: &K,
        value: &V,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            key: Some(serde_json::to_value(key)?),
            value: serde_json::to_value(value)?,
        })
    }

    /// Creates an unkeyed record from a serializable value.
    pub fn unkeyed<V: Serialize>(value: &V) -> Result<Self, serde_json::Error> {
        Ok(Self {
            key: None,
            value: serde_json::to_value(value)?,
        })
    }

    /// Creates a record from raw JSON key and value.
    pub fn from_parts(key: Option<serde_json::Value>, value: serde_json::Value) -> Self {
        Self { key, value }
    }
}
