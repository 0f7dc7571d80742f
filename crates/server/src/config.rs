//! Application configuration loaded from environment variables.

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `8082`)
/// - `INPUT_CHANNEL` — change-data-capture channel (default:
///   `"connect-org.chicago.cta.stations"`)
/// - `OUTPUT_CHANNEL` — enriched channel / view changelog (default:
///   `"org.chicago.cta.stations"`)
/// - `INPUT_PARTITIONS` — input partition count (default: `4`)
/// - `CONSUMER_GROUP` — transformer consumer group (default:
///   `"stations-transformer"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub input_channel: String,
    pub output_channel: String,
    pub input_partitions: u32,
    pub group: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8082),
            input_channel: std::env::var("INPUT_CHANNEL")
                .unwrap_or_else(|_| "connect-org.chicago.cta.stations".to_string()),
            output_channel: std::env::var("OUTPUT_CHANNEL")
                .unwrap_or_else(|_| "org.chicago.cta.stations".to_string()),
            input_partitions: std::env::var("INPUT_PARTITIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4),
            group: std::env::var("CONSUMER_GROUP")
                .unwrap_or_else(|_| "stations-transformer".to_string()),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8082,
            input_channel: "connect-org.chicago.cta.stations".to_string(),
            output_channel: "org.chicago.cta.stations".to_string(),
            input_partitions: 4,
            group: "stations-transformer".to_string(),
        }
    }
}
