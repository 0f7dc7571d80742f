use channel::ChannelSpec;
use reqwest::Client;
use serde::Serialize;
use uuid::Uuid;

use crate::{Result, WeatherError};

/// Content type declaring JSON-serialized records to the gateway.
pub const KAFKA_JSON_V2: &str = "application/vnd.kafka.json.v2+json";

/// HTTP client for the stream gateway.
///
/// The gateway fronts the broker for producers that do not speak the
/// broker protocol: `POST /topics` provisions a channel, and
/// `POST /topics/{name}` appends a batch of records.
pub struct GatewayClient {
    base_url: String,
    http: Client,
    client_id: Uuid,
}

impl GatewayClient {
    /// Creates a client against a gateway base url.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            http: Client::new(),
            client_id: Uuid::new_v4(),
        }
    }

    /// Asks the gateway to ensure a channel with the given spec exists.
    pub async fn create_topic(&self, spec: &ChannelSpec) -> Result<()> {
        let url = format!("{}/topics", self.base_url);
        tracing::debug!(%url, topic = %spec.name, client_id = %self.client_id, "creating topic via gateway");

        let response = self.http.post(&url).json(spec).send().await?;
        Self::check(response).await
    }

    /// Publishes a batch of keyed records to a topic.
    pub async fn publish<K: Serialize, V: Serialize>(
        &self,
        topic: &str,
        records: &[(K, V)],
    ) -> Result<()> {
        let mut batch = Vec::with_capacity(records.len());
        for (key, value) in records {
            batch.push(serde_json::json!({
                "key": serde_json::to_value(key)?,
                "value": serde_json::to_value(value)?,
            }));
        }
        let body = serde_json::to_vec(&serde_json::json!({ "records": batch }))?;

        let url = format!("{}/topics/{}", self.base_url, topic);
        tracing::debug!(%url, records = records.len(), "publishing batch via gateway");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, KAFKA_JSON_V2)
            .body(body)
            .send()
            .await?;
        Self::check(response).await
    }

    async fn check(response: reqwest::Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(WeatherError::Gateway { status, body })
    }
}
