use thiserror::Error;

/// Errors that can occur when interacting with the broker.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// The channel does not exist on the broker.
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// A create request was issued for a channel that already exists.
    /// Provisioning treats this as success; direct callers may not.
    #[error("Channel already exists: {0}")]
    AlreadyExists(String),

    /// The requested partition does not exist on the channel.
    #[error("Channel {channel} has no partition {partition}")]
    PartitionOutOfRange { channel: String, partition: u32 },

    /// The requested replication factor exceeds the available brokers.
    /// This is a fatal configuration error, never retried.
    #[error(
        "Replication factor {requested} for channel {channel} exceeds available brokers ({available})"
    )]
    ReplicationFactor {
        channel: String,
        requested: u32,
        available: u32,
    },

    /// A serialization/deserialization error occurred at the boundary.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for channel operations.
pub type Result<T> = std::result::Result<T, ChannelError>;
