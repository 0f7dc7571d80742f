use serde::{Deserialize, Serialize};

/// Unique identifier for a transit station.
///
/// Wraps the numeric station id carried on every change-data-capture
/// record to prevent mixing it up with other integer fields such as
/// `stop_id` or `order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(i64);

impl StationId {
    /// Creates a station ID from a raw value.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw station id.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for StationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for StationId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<StationId> for i64 {
    fn from(id: StationId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_preserves_value() {
        let id = StationId::new(40850);
        assert_eq!(id.as_i64(), 40850);
    }

    #[test]
    fn station_id_display() {
        assert_eq!(StationId::new(40850).to_string(), "40850");
    }

    #[test]
    fn station_id_serializes_as_bare_integer() {
        let id = StationId::new(40850);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "40850");
        let back: StationId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
