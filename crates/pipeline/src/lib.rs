//! The stream transformation pipeline.
//!
//! This crate drives the consume → enrich → produce → view-update cycle:
//! - [`TransformerAgent`] consumes the input channel, enriches each
//!   station record and republishes it keyed by station id
//! - [`StationTable`] is the materialized view of the latest enriched
//!   record per station, rebuildable from the output channel's history

pub mod agent;
pub mod error;
pub mod table;

pub use agent::{AgentConfig, TransformerAgent};
pub use error::{PipelineError, Result};
pub use table::StationTable;
