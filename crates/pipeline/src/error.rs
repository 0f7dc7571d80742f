use thiserror::Error;

/// Errors that can occur while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// An error occurred at the channel boundary.
    #[error("Channel error: {0}")]
    Channel(#[from] channel::ChannelError),

    /// Failed to serialize an output record.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A partition worker task failed to complete.
    #[error("Partition worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
