use channel::ChannelSpec;
use chrono::Utc;
use rand::Rng;

use crate::{GatewayClient, Result, WeatherModel};

/// Publishes weather readings through the gateway.
///
/// The producer owns its output channel: on the first emit it asks the
/// gateway to provision the channel with the configured spec, and
/// remembers the outcome so later emits skip the round-trip.
pub struct WeatherProducer {
    gateway: GatewayClient,
    spec: ChannelSpec,
    provisioned: bool,
}

impl WeatherProducer {
    /// Creates a producer for the channel described by `spec`.
    pub fn new(gateway: GatewayClient, spec: ChannelSpec) -> Self {
        Self {
            gateway,
            spec,
            provisioned: false,
        }
    }

    /// Returns whether the output channel has been provisioned.
    pub fn is_provisioned(&self) -> bool {
        self.provisioned
    }

    /// Advances the weather model one tick and publishes the reading,
    /// keyed by the emit timestamp in epoch milliseconds.
    pub async fn emit<R: Rng>(&mut self, model: &mut WeatherModel, rng: &mut R) -> Result<()> {
        if !self.provisioned {
            self.gateway.create_topic(&self.spec).await?;
            self.provisioned = true;
        }

        model.step(rng);
        let reading = model.reading();
        let key = serde_json::json!({ "timestamp": Utc::now().timestamp_millis() });

        self.gateway
            .publish(&self.spec.name, &[(key, serde_json::to_value(&reading)?)])
            .await?;

        metrics::counter!("weather_readings_published").increment(1);
        tracing::debug!(
            temperature = reading.temperature,
            status = %reading.status,
            "sent weather reading"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[tokio::test]
    async fn provisions_the_channel_exactly_once() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/topics");
                then.status(200);
            })
            .await;
        let publish = server
            .mock_async(|when, then| {
                when.method(POST).path("/topics/org.chicago.cta.weather");
                then.status(200);
            })
            .await;

        let gateway = GatewayClient::new(server.base_url());
        let spec = ChannelSpec::new("org.chicago.cta.weather", 3, 1);
        let mut producer = WeatherProducer::new(gateway, spec);
        let mut model = WeatherModel::new(7);
        let mut rng = StdRng::seed_from_u64(1);

        producer.emit(&mut model, &mut rng).await.unwrap();
        producer.emit(&mut model, &mut rng).await.unwrap();
        producer.emit(&mut model, &mut rng).await.unwrap();

        create.assert_hits_async(1).await;
        publish.assert_hits_async(3).await;
        assert!(producer.is_provisioned());
    }

    #[tokio::test]
    async fn provisioning_failure_keeps_the_producer_unprovisioned() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/topics");
                then.status(422).body("replication factor too large");
            })
            .await;

        let gateway = GatewayClient::new(server.base_url());
        let spec = ChannelSpec::new("org.chicago.cta.weather", 3, 3);
        let mut producer = WeatherProducer::new(gateway, spec);
        let mut model = WeatherModel::new(0);
        let mut rng = StdRng::seed_from_u64(2);

        assert!(producer.emit(&mut model, &mut rng).await.is_err());
        assert!(!producer.is_provisioned());
    }
}
