use common::StationId;
use serde::{Deserialize, Serialize};

use crate::Line;

/// A station record as emitted by the change-data-capture source.
///
/// The three line flags are expected to be mutually exclusive, but the
/// source does not enforce that; see [`Station::line`] for how
/// conflicting flags are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub stop_id: i64,
    pub direction_id: String,
    pub stop_name: String,
    pub station_name: String,
    pub station_descriptive_name: String,
    pub station_id: StationId,
    pub order: i64,
    pub red: bool,
    pub blue: bool,
    pub green: bool,
}

impl Station {
    /// Derives the line category for this station.
    ///
    /// First true flag wins, in red, blue, green order; a record with no
    /// true flag maps to [`Line::Undefined`] rather than failing. The
    /// priority order is a compatibility contract with downstream
    /// consumers and must not change.
    pub fn line(&self) -> Line {
        if self.red {
            Line::Red
        } else if self.blue {
            Line::Blue
        } else if self.green {
            Line::Green
        } else {
            Line::Undefined
        }
    }
}
