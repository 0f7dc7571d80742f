use thiserror::Error;

/// Errors raised while producing weather readings.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The gateway request could not be sent or read.
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-success status.
    #[error("Gateway returned {status}: {body}")]
    Gateway {
        status: reqwest::StatusCode,
        body: String,
    },

    /// A record could not be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for weather producer operations.
pub type Result<T> = std::result::Result<T, WeatherError>;
