use std::pin::Pin;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use serde::{Deserialize, Serialize};

use crate::{Offset, PartitionId, ProducerRecord, Record, Result};

/// Log cleanup policy for a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    /// Segments past retention are deleted.
    Delete,
    /// The log is compacted down to the latest record per key.
    Compact,
}

/// Compression codec applied to a channel's segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    None,
    Lz4,
    Gzip,
}

/// Per-channel retention and compaction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelConfig {
    #[serde(rename = "cleanup.policy")]
    pub cleanup_policy: CleanupPolicy,

    #[serde(rename = "compression.type")]
    pub compression: Compression,

    #[serde(rename = "delete.retention.ms")]
    pub delete_retention_ms: u64,

    #[serde(rename = "file.delete.delay.ms")]
    pub file_delete_delay_ms: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            cleanup_policy: CleanupPolicy::Delete,
            compression: Compression::Lz4,
            delete_retention_ms: 2000,
            file_delete_delay_ms: 2000,
        }
    }
}

/// Requested shape of a channel: name, partitioning, replication and
/// cleanup configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSpec {
    pub name: String,

    pub partitions: u32,

    #[serde(rename = "replication_factor")]
    pub replication: u32,

    #[serde(default = "ChannelConfig::default")]
    pub config: ChannelConfig,
}

impl ChannelSpec {
    /// Creates a spec with the default cleanup configuration.
    pub fn new(name: impl Into<String>, partitions: u32, replication: u32) -> Self {
        Self {
            name: name.into(),
            partitions,
            replication,
            config: ChannelConfig::default(),
        }
    }

    /// Switches the channel to log compaction, keeping the latest record
    /// per key. Used for channels that back a materialized view.
    pub fn compacted(mut self) -> Self {
        self.config.cleanup_policy = CleanupPolicy::Compact;
        self
    }

    /// Overrides the full cleanup configuration.
    pub fn with_config(mut self, config: ChannelConfig) -> Self {
        self.config = config;
        self
    }
}

/// A stream of records replayed from a channel.
pub type RecordStream = Pin<Box<dyn Stream<Item = Result<Record>> + Send>>;

/// The broker boundary: an ordered, partitioned, append-only log.
///
/// Within one partition, records are totally ordered by offset. Keyed
/// records with equal keys always land on the same partition, so a key
/// has a total order across the channel. Cross-partition ordering is
/// unspecified.
///
/// Consumed progress is tracked per (channel, group, partition). The
/// committed offset is the last fully-processed offset; a consumer
/// resumes from its successor. Until an offset is committed the broker
/// redelivers from the last commit, giving at-least-once delivery.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Creates a channel with the given spec.
    ///
    /// Fails with [`crate::ChannelError::AlreadyExists`] if the channel
    /// is already present and with
    /// [`crate::ChannelError::ReplicationFactor`] if the requested
    /// replication exceeds the broker count.
    async fn create_channel(&self, spec: &ChannelSpec) -> Result<()>;

    /// Returns whether a channel with this name exists.
    async fn channel_exists(&self, name: &str) -> Result<bool>;

    /// Returns the partition count of an existing channel.
    async fn partitions(&self, channel: &str) -> Result<u32>;

    /// Appends a record, returning its assigned partition and offset.
    async fn publish(
        &self,
        channel: &str,
        record: ProducerRecord,
    ) -> Result<(PartitionId, Offset)>;

    /// Long-poll batch read from one partition.
    ///
    /// Returns up to `max` records with offsets `>= from`, in offset
    /// order. If no records are available the call waits up to `wait`
    /// and then returns an empty batch; it never blocks indefinitely.
    async fn fetch(
        &self,
        channel: &str,
        partition: PartitionId,
        from: Offset,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<Record>>;

    /// Records `offset` as the last fully-processed offset for a group.
    async fn commit_offset(
        &self,
        channel: &str,
        group: &str,
        partition: PartitionId,
        offset: Offset,
    ) -> Result<()>;

    /// Returns the last committed offset for a group, if any.
    async fn committed_offset(
        &self,
        channel: &str,
        group: &str,
        partition: PartitionId,
    ) -> Result<Option<Offset>>;

    /// Streams every retained record of a channel from offset zero.
    ///
    /// Per-partition order is preserved; partitions are emitted one
    /// after another. Used to rebuild materialized views from a
    /// channel's history.
    async fn replay(&self, channel: &str) -> Result<RecordStream>;
}
