use channel::ChannelSpec;

/// Producer configuration loaded from environment variables.
///
/// - `GATEWAY_URL` — stream gateway base url (default
///   `"http://localhost:8082"`)
/// - `WEATHER_CHANNEL` — output channel name (default
///   `"org.chicago.cta.weather"`)
/// - `WEATHER_PARTITIONS` — partition count (default `3`)
/// - `WEATHER_REPLICATION` — replication factor (default `1`; must not
///   exceed the deployment's broker count)
/// - `WEATHER_MONTH` — zero-based month override for the model
/// - `EMIT_INTERVAL_MS` — milliseconds between readings (default `1000`)
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub gateway_url: String,
    pub channel: String,
    pub partitions: u32,
    pub replication: u32,
    pub month: Option<u32>,
    pub emit_interval_ms: u64,
}

impl WeatherConfig {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            gateway_url: std::env::var("GATEWAY_URL")
                .unwrap_or_else(|_| "http://localhost:8082".to_string()),
            channel: std::env::var("WEATHER_CHANNEL")
                .unwrap_or_else(|_| "org.chicago.cta.weather".to_string()),
            partitions: std::env::var("WEATHER_PARTITIONS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3),
            replication: std::env::var("WEATHER_REPLICATION")
                .ok()
                .and_then(|r| r.parse().ok())
                .unwrap_or(1),
            month: std::env::var("WEATHER_MONTH")
                .ok()
                .and_then(|m| m.parse().ok()),
            emit_interval_ms: std::env::var("EMIT_INTERVAL_MS")
                .ok()
                .and_then(|i| i.parse().ok())
                .unwrap_or(1000),
        }
    }

    /// Returns the channel spec this producer provisions.
    pub fn channel_spec(&self) -> ChannelSpec {
        ChannelSpec::new(self.channel.clone(), self.partitions, self.replication)
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://localhost:8082".to_string(),
            channel: "org.chicago.cta.weather".to_string(),
            partitions: 3,
            replication: 1,
            month: None,
            emit_interval_ms: 1000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = WeatherConfig::default();
        assert_eq!(config.gateway_url, "http://localhost:8082");
        assert_eq!(config.channel, "org.chicago.cta.weather");
        assert_eq!(config.partitions, 3);
        assert_eq!(config.replication, 1);
        assert_eq!(config.emit_interval_ms, 1000);
    }

    #[test]
    fn channel_spec_carries_the_configured_shape() {
        let config = WeatherConfig {
            partitions: 5,
            replication: 2,
            ..WeatherConfig::default()
        };
        let spec = config.channel_spec();
        assert_eq!(spec.name, "org.chicago.cta.weather");
        assert_eq!(spec.partitions, 5);
        assert_eq!(spec.replication, 2);
    }
}
