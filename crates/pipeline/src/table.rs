use std::collections::HashMap;
use std::sync::Arc;

use channel::Broker;
use common::StationId;
use futures_util::StreamExt;
use stations::TransformedStation;
use tokio::sync::RwLock;

use crate::Result;

/// Materialized view of the latest enriched record per station.
///
/// The table is a derived projection: its authoritative backing is the
/// output channel's history, and [`StationTable::rebuild`] reconstructs
/// it from that history alone. The write path ([`StationTable::apply`])
/// is crate-private — only the transformer agent and the rebuild path
/// mutate entries; everything else gets point lookups.
#[derive(Clone, Default)]
pub struct StationTable {
    entries: Arc<RwLock<HashMap<StationId, TransformedStation>>>,
}

impl StationTable {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the latest enriched record for a station.
    pub async fn get(&self, station_id: StationId) -> Option<TransformedStation> {
        self.entries.read().await.get(&station_id).cloned()
    }

    /// Returns all entries, ordered by their sequence position.
    pub async fn all(&self) -> Vec<TransformedStation> {
        let mut stations: Vec<TransformedStation> =
            self.entries.read().await.values().cloned().collect();
        stations.sort_by_key(|s| (s.order, s.station_id));
        stations
    }

    /// Returns the number of stations in the view.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether the view is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Upserts the entry for a station. First enrichment of a key
    /// creates it; every later one overwrites it.
    pub(crate) async fn apply(&self, station: TransformedStation) {
        self.entries.write().await.insert(station.station_id, station);
    }

    /// Discards the current contents and reconstructs the view by
    /// replaying the output channel from offset zero. Returns the
    /// number of records applied.
    ///
    /// Must complete before live records are applied; the agent calls
    /// it on startup, before any partition worker starts.
    #[tracing::instrument(skip(self, broker))]
    pub async fn rebuild<B: Broker>(&self, broker: &B, channel: &str) -> Result<usize> {
        let mut stream = broker.replay(channel).await?;
        let mut rebuilt: HashMap<StationId, TransformedStation> = HashMap::new();
        let mut applied = 0usize;

        while let Some(record) = stream.next().await {
            let record = record?;
            match record.value_as::<TransformedStation>() {
                Ok(station) => {
                    rebuilt.insert(station.station_id, station);
                    applied += 1;
                }
                Err(err) => {
                    tracing::warn!(
                        offset = %record.offset,
                        error = %err,
                        "skipping malformed changelog record during rebuild"
                    );
                }
            }
        }

        *self.entries.write().await = rebuilt;
        tracing::info!(records = applied, "view rebuilt from channel history");
        Ok(applied)
    }
}
