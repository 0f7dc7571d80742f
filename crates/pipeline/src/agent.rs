use std::time::Duration;

use channel::{Broker, Offset, PartitionId, ProducerRecord};
use stations::{Station, TransformedStation};
use tokio::sync::watch;
use uuid::Uuid;

use crate::{Result, StationTable};

/// Channel names, consumer group and batching knobs for the agent.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Channel the change-data-capture source publishes to.
    pub input_channel: String,

    /// Channel enriched records are republished to. Doubles as the
    /// table's changelog.
    pub output_channel: String,

    /// Consumer group under which input offsets are committed.
    pub group: String,

    /// Maximum records pulled per fetch. Bounds in-flight work: the
    /// next batch is not pulled until this one is published and
    /// committed.
    pub batch_size: usize,

    /// Long-poll wait per fetch before returning an empty batch.
    pub poll_wait: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            input_channel: "connect-org.chicago.cta.stations".to_string(),
            output_channel: "org.chicago.cta.stations".to_string(),
            group: "stations-transformer".to_string(),
            batch_size: 64,
            poll_wait: Duration::from_millis(500),
        }
    }
}

/// Consumes station records, enriches them with their line, republishes
/// them keyed by station id and keeps the materialized view current.
///
/// One worker task is spawned per input partition; each owns its
/// partition's ordering exclusively. Offsets are committed only after
/// every record of a batch has been published and applied, so a restart
/// replays unacknowledged records (at-least-once).
pub struct TransformerAgent<B> {
    broker: B,
    table: StationTable,
    config: AgentConfig,
}

impl<B: Broker + Clone + 'static> TransformerAgent<B> {
    /// Creates an agent over a broker and a view to maintain.
    pub fn new(broker: B, table: StationTable, config: AgentConfig) -> Self {
        Self {
            broker,
            table,
            config,
        }
    }

    /// Returns the view this agent maintains.
    pub fn table(&self) -> &StationTable {
        &self.table
    }

    /// Runs the agent until the shutdown flag flips.
    ///
    /// The view is rebuilt from the output channel's backlog first;
    /// live records are only applied once the rebuild has completed,
    /// so the two never interleave. Shutdown lets an in-flight batch
    /// finish and commit; a fetch still waiting is abandoned without
    /// consuming anything.
    #[tracing::instrument(skip(self, shutdown), fields(input = %self.config.input_channel, output = %self.config.output_channel))]
    pub async fn run(&self, shutdown: watch::Receiver<bool>) -> Result<()> {
        self.table
            .rebuild(&self.broker, &self.config.output_channel)
            .await?;

        let partitions = self.broker.partitions(&self.config.input_channel).await?;
        let mut workers = Vec::with_capacity(partitions as usize);
        for index in 0..partitions {
            workers.push(tokio::spawn(partition_worker(
                self.broker.clone(),
                self.table.clone(),
                self.config.clone(),
                PartitionId::new(index),
                shutdown.clone(),
            )));
        }

        for worker in workers {
            worker.await??;
        }

        tracing::info!("transformer agent stopped");
        Ok(())
    }
}

/// Consumer loop owning one input partition.
async fn partition_worker<B: Broker>(
    broker: B,
    table: StationTable,
    config: AgentConfig,
    partition: PartitionId,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let member_id = Uuid::new_v4();
    let mut next = match broker
        .committed_offset(&config.input_channel, &config.group, partition)
        .await?
    {
        Some(committed) => committed.next(),
        None => Offset::zero(),
    };

    tracing::info!(%partition, %member_id, resume_from = %next, "partition worker started");

    loop {
        if *shutdown.borrow() {
            break;
        }

        let batch = tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            fetched = broker.fetch(
                &config.input_channel,
                partition,
                next,
                config.batch_size,
                config.poll_wait,
            ) => fetched?,
        };

        let Some(last) = batch.last().map(|record| record.offset) else {
            continue;
        };

        for record in batch {
            match record.value_as::<Station>() {
                Ok(station) => {
                    let transformed = TransformedStation::from_station(&station);
                    let out = ProducerRecord::keyed(&station.station_id, &transformed)?;
                    broker.publish(&config.output_channel, out).await?;
                    table.apply(transformed).await;
                    metrics::counter!("pipeline_records_transformed").increment(1);
                }
                Err(err) => {
                    metrics::counter!("pipeline_records_skipped").increment(1);
                    tracing::warn!(
                        %partition,
                        offset = %record.offset,
                        error = %err,
                        "skipping malformed station record"
                    );
                }
            }
        }

        broker
            .commit_offset(&config.input_channel, &config.group, partition, last)
            .await?;
        next = last.next();
    }

    tracing::info!(%partition, %member_id, "partition worker stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_names_the_cta_channels() {
        let config = AgentConfig::default();
        assert_eq!(config.input_channel, "connect-org.chicago.cta.stations");
        assert_eq!(config.output_channel, "org.chicago.cta.stations");
        assert!(config.batch_size > 0);
    }
}
