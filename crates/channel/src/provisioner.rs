use std::collections::HashSet;

use tokio::sync::RwLock;

use crate::{ChannelError, Result, broker::Broker, broker::ChannelSpec};

/// Idempotent channel creation.
///
/// `ensure` makes a channel exist with the requested spec without
/// erroring if it already does. Channel names seen by this instance are
/// cached so repeated use of the same channel within one process skips
/// the broker round-trip. The cache is owned by the instance; share the
/// provisioner itself (it is cheap to wrap in an `Arc`) rather than the
/// set.
pub struct Provisioner<B: Broker> {
    broker: B,
    known: RwLock<HashSet<String>>,
}

impl<B: Broker> Provisioner<B> {
    /// Creates a provisioner against a broker.
    pub fn new(broker: B) -> Self {
        Self {
            broker,
            known: RwLock::new(HashSet::new()),
        }
    }

    /// Ensures the channel exists.
    ///
    /// Issues a create request only when the channel is absent. A
    /// concurrent creator winning the race is treated as success.
    /// Fatal configuration errors (impossible replication factor)
    /// propagate to the caller.
    #[tracing::instrument(skip(self, spec), fields(channel = %spec.name))]
    pub async fn ensure(&self, spec: &ChannelSpec) -> Result<()> {
        if self.known.read().await.contains(&spec.name) {
            return Ok(());
        }

        if !self.broker.channel_exists(&spec.name).await? {
            match self.broker.create_channel(spec).await {
                Ok(()) => {
                    metrics::counter!("channel_provisioned").increment(1);
                    tracing::info!(
                        partitions = spec.partitions,
                        replication = spec.replication,
                        "channel created"
                    );
                }
                Err(ChannelError::AlreadyExists(_)) => {
                    tracing::debug!("channel created concurrently elsewhere");
                }
                Err(err) => return Err(err),
            }
        }

        self.known.write().await.insert(spec.name.clone());
        Ok(())
    }

    /// Returns whether a channel name is in this instance's cache.
    pub async fn is_known(&self, name: &str) -> bool {
        self.known.read().await.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryBroker;

    #[tokio::test]
    async fn ensure_creates_channel_once() {
        let broker = InMemoryBroker::new();
        let provisioner = Provisioner::new(broker.clone());
        let spec = ChannelSpec::new("org.chicago.cta.stations", 1, 1).compacted();

        provisioner.ensure(&spec).await.unwrap();
        provisioner.ensure(&spec).await.unwrap();

        assert_eq!(broker.create_requests(), 1);
        assert!(broker.channel_exists("org.chicago.cta.stations").await.unwrap());
        assert!(provisioner.is_known("org.chicago.cta.stations").await);
    }

    #[tokio::test]
    async fn ensure_accepts_existing_channel() {
        let broker = InMemoryBroker::new();
        let spec = ChannelSpec::new("connect-org.chicago.cta.stations", 4, 1);
        broker.create_channel(&spec).await.unwrap();

        let provisioner = Provisioner::new(broker.clone());
        provisioner.ensure(&spec).await.unwrap();

        // Existence check satisfied the ensure; no second create was sent.
        assert_eq!(broker.create_requests(), 1);
    }

    #[tokio::test]
    async fn lost_create_race_is_success() {
        let broker = InMemoryBroker::new();
        let spec = ChannelSpec::new("org.chicago.cta.weather", 3, 1);

        // Two provisioner instances race for the same channel: both may
        // issue a create, but neither surfaces an error.
        let first = Provisioner::new(broker.clone());
        let second = Provisioner::new(broker.clone());

        let (a, b) = tokio::join!(first.ensure(&spec), second.ensure(&spec));
        a.unwrap();
        b.unwrap();

        assert!(broker.channel_exists("org.chicago.cta.weather").await.unwrap());
    }

    #[tokio::test]
    async fn fatal_configuration_errors_propagate() {
        let broker = InMemoryBroker::with_brokers(1);
        let provisioner = Provisioner::new(broker.clone());
        let spec = ChannelSpec::new("org.chicago.cta.weather", 3, 3);

        let result = provisioner.ensure(&spec).await;

        assert!(matches!(
            result,
            Err(ChannelError::ReplicationFactor { .. })
        ));
        assert!(!provisioner.is_known("org.chicago.cta.weather").await);
    }
}
