use common::StationId;
use serde::{Deserialize, Serialize};

use crate::{Line, Station};

/// The enriched station record published to the output channel.
///
/// Carries the subset of the source record downstream consumers need,
/// plus the derived line. It has no identity of its own; it is always
/// constructed from a [`Station`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformedStation {
    pub station_id: StationId,
    pub station_name: String,
    pub order: i64,
    pub line: Line,
}

impl TransformedStation {
    /// Builds the enriched record. The input is borrowed, never mutated.
    pub fn from_station(station: &Station) -> Self {
        Self {
            station_id: station.station_id,
            station_name: station.station_name.clone(),
            order: station.order,
            line: station.line(),
        }
    }
}

impl From<&Station> for TransformedStation {
    fn from(station: &Station) -> Self {
        Self::from_station(station)
    }
}
