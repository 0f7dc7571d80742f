//! Channel abstraction for the transit stream pipeline.
//!
//! A channel is an ordered, partitioned, append-only log of records,
//! owned by an external broker. This crate specifies that boundary:
//! - [`Broker`] trait for publish, fetch, offset commit and replay
//! - [`Record`]/[`ProducerRecord`] for the wire-level record model
//! - [`InMemoryBroker`] in-process implementation
//! - [`Provisioner`] for idempotent channel creation

pub mod broker;
pub mod error;
pub mod memory;
pub mod provisioner;
pub mod record;

pub use broker::{Broker, ChannelConfig, ChannelSpec, CleanupPolicy, Compression, RecordStream};
pub use error::{ChannelError, Result};
pub use memory::InMemoryBroker;
pub use provisioner::Provisioner;
pub use record::{Offset, PartitionId, ProducerRecord, Record};
