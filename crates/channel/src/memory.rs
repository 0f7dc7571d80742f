use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Notify, RwLock};

use crate::{
    ChannelError, Offset, PartitionId, ProducerRecord, Record, Result,
    broker::{Broker, ChannelSpec, CleanupPolicy, RecordStream},
};

struct ChannelState {
    spec: ChannelSpec,
    partitions: Vec<Vec<Record>>,
    next_offsets: Vec<Offset>,
    round_robin: u64,
}

impl ChannelState {
    fn new(spec: ChannelSpec) -> Self {
        let partitions = spec.partitions as usize;
        Self {
            spec,
            partitions: vec![Vec::new(); partitions],
            next_offsets: vec![Offset::zero(); partitions],
            round_robin: 0,
        }
    }
}

/// In-process broker implementation.
///
/// Backs the binaries and the test suites with the same partitioned-log
/// semantics the external broker provides: per-partition offset order,
/// key-consistent partition assignment, per-group offset commits,
/// replay from offset zero, and log compaction for channels with a
/// compact cleanup policy.
#[derive(Clone)]
pub struct InMemoryBroker {
    channels: Arc<RwLock<HashMap<String, ChannelState>>>,
    commits: Arc<RwLock<HashMap<(String, String, PartitionId), Offset>>>,
    appended: Arc<Notify>,
    create_requests: Arc<AtomicU64>,
    broker_count: u32,
}

impl Default for InMemoryBroker {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBroker {
    /// Creates a single-node broker.
    pub fn new() -> Self {
        Self::with_brokers(1)
    }

    /// Creates a broker simulating a cluster of `broker_count` nodes.
    /// Channel creation rejects replication factors above this count.
    pub fn with_brokers(broker_count: u32) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            commits: Arc::new(RwLock::new(HashMap::new())),
            appended: Arc::new(Notify::new()),
            create_requests: Arc::new(AtomicU64::new(0)),
            broker_count,
        }
    }

    /// Returns how many create requests this broker has received,
    /// including ones that failed.
    pub fn create_requests(&self) -> u64 {
        self.create_requests.load(Ordering::SeqCst)
    }

    /// Returns the total number of retained records on a channel.
    pub async fn record_count(&self, channel: &str) -> Result<usize> {
        let channels = self.channels.read().await;
        let state = channels
            .get(channel)
            .ok_or_else(|| ChannelError::ChannelNotFound(channel.to_string()))?;
        Ok(state.partitions.iter().map(Vec::len).sum())
    }

    /// Runs log compaction on a compact-policy channel, retaining only
    /// the latest record per key. Offsets of surviving records are
    /// preserved, so replay remains correct. Unkeyed records are not
    /// retained by compaction.
    ///
    /// No-op for channels with a delete cleanup policy.
    pub async fn compact(&self, channel: &str) -> Result<()> {
        let mut channels = self.channels.write().await;
        let state = channels
            .get_mut(channel)
            .ok_or_else(|| ChannelError::ChannelNotFound(channel.to_string()))?;

        if state.spec.config.cleanup_policy != CleanupPolicy::Compact {
            tracing::debug!(channel, "compaction skipped, cleanup policy is delete");
            return Ok(());
        }

        for partition in &mut state.partitions {
            let mut latest: HashMap<String, Offset> = HashMap::new();
            for record in partition.iter() {
                if let Some(key) = &record.key {
                    latest.insert(key.to_string(), record.offset);
                }
            }
            partition.retain(|record| {
                record
                    .key
                    .as_ref()
                    .is_some_and(|key| latest.get(&key.to_string()) == Some(&record.offset))
            });
        }

        tracing::debug!(channel, "log compacted");
        Ok(())
    }

    fn partition_for_key(key: &serde_json::Value, partitions: u32) -> PartitionId {
        let mut hasher = DefaultHasher::new();
        key.to_string().hash(&mut hasher);
        PartitionId::new((hasher.finish() % u64::from(partitions)) as u32)
    }
}

#[async_trait]
impl Broker for InMemoryBroker {
    async fn create_channel(&self, spec: &ChannelSpec) -> Result<()> {
        self.create_requests.fetch_add(1, Ordering::SeqCst);

        if spec.replication > self.broker_count {
            return Err(ChannelError::ReplicationFactor {
                channel: spec.name.clone(),
                requested: spec.replication,
                available: self.broker_count,
            });
        }

        let mut channels = self.channels.write().await;
        if channels.contains_key(&spec.name) {
            return Err(ChannelError::AlreadyExists(spec.name.clone()));
        }

        channels.insert(spec.name.clone(), ChannelState::new(spec.clone()));
        metrics::counter!("channel_channels_created").increment(1);
        Ok(())
    }

    async fn channel_exists(&self, name: &str) -> Result<bool> {
        Ok(self.channels.read().await.contains_key(name))
    }

    async fn partitions(&self, channel: &str) -> Result<u32> {
        let channels = self.channels.read().await;
        let state = channels
            .get(channel)
            .ok_or_else(|| ChannelError::ChannelNotFound(channel.to_string()))?;
        Ok(state.spec.partitions)
    }

    async fn publish(
        &self,
        channel: &str,
        record: ProducerRecord,
    ) -> Result<(PartitionId, Offset)> {
        let (partition, offset) = {
            let mut channels = self.channels.write().await;
            let state = channels
                .get_mut(channel)
                .ok_or_else(|| ChannelError::ChannelNotFound(channel.to_string()))?;

            let partition = match &record.key {
                Some(key) => Self::partition_for_key(key, state.spec.partitions),
                None => {
                    let index = state.round_robin % u64::from(state.spec.partitions);
                    state.round_robin += 1;
                    PartitionId::new(index as u32)
                }
            };

            let slot = partition.as_u32() as usize;
            let offset = state.next_offsets[slot];
            state.next_offsets[slot] = offset.next();
            state.partitions[slot].push(Record {
                key: record.key,
                value: record.value,
                partition,
                offset,
                timestamp: Utc::now(),
            });
            (partition, offset)
        };

        self.appended.notify_waiters();
        metrics::counter!("channel_records_published").increment(1);
        Ok((partition, offset))
    }

    async fn fetch(
        &self,
        channel: &str,
        partition: PartitionId,
        from: Offset,
        max: usize,
        wait: Duration,
    ) -> Result<Vec<Record>> {
        let deadline = tokio::time::Instant::now() + wait;

        loop {
            let mut notified = std::pin::pin!(self.appended.notified());
            notified.as_mut().enable();

            {
                let channels = self.channels.read().await;
                let state = channels
                    .get(channel)
                    .ok_or_else(|| ChannelError::ChannelNotFound(channel.to_string()))?;
                let slot = partition.as_u32() as usize;
                if slot >= state.partitions.len() {
                    return Err(ChannelError::PartitionOutOfRange {
                        channel: channel.to_string(),
                        partition: partition.as_u32(),
                    });
                }

                let records: Vec<Record> = state.partitions[slot]
                    .iter()
                    .filter(|record| record.offset >= from)
                    .take(max)
                    .cloned()
                    .collect();
                if !records.is_empty() {
                    return Ok(records);
                }
            }

            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(Vec::new());
            }
        }
    }

    async fn commit_offset(
        &self,
        channel: &str,
        group: &str,
        partition: PartitionId,
        offset: Offset,
    ) -> Result<()> {
        let mut commits = self.commits.write().await;
        commits.insert(
            (channel.to_string(), group.to_string(), partition),
            offset,
        );
        Ok(())
    }

    async fn committed_offset(
        &self,
        channel: &str,
        group: &str,
        partition: PartitionId,
    ) -> Result<Option<Offset>> {
        let commits = self.commits.read().await;
        Ok(commits
            .get(&(channel.to_string(), group.to_string(), partition))
            .copied())
    }

    async fn replay(&self, channel: &str) -> Result<RecordStream> {
        use futures_util::stream;

        let channels = self.channels.read().await;
        let state = channels
            .get(channel)
            .ok_or_else(|| ChannelError::ChannelNotFound(channel.to_string()))?;

        let records: Vec<Record> = state
            .partitions
            .iter()
            .flat_map(|partition| partition.iter().cloned())
            .collect();

        Ok(Box::pin(stream::iter(records.into_iter().map(Ok))))
    }
}
