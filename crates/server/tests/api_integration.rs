//! Integration tests for the pipeline server.

use std::sync::OnceLock;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use channel::{ChannelSpec, InMemoryBroker};
use metrics_exporter_prometheus::PrometheusHandle;
use pipeline::{AgentConfig, TransformerAgent};
use tokio::sync::watch;
use tower::ServiceExt;

const INPUT: &str = "connect-org.chicago.cta.stations";
const OUTPUT: &str = "org.chicago.cta.stations";

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestServer {
    app: axum::Router,
    _shutdown: watch::Sender<bool>,
}

async fn setup() -> TestServer {
    let broker = InMemoryBroker::new();
    let (state, table) = server::create_default_state(broker.clone());

    state
        .provisioner
        .ensure(&ChannelSpec::new(INPUT, 1, 1))
        .await
        .unwrap();
    state
        .provisioner
        .ensure(&ChannelSpec::new(OUTPUT, 1, 1).compacted())
        .await
        .unwrap();

    let agent = TransformerAgent::new(
        broker,
        table,
        AgentConfig {
            poll_wait: Duration::from_millis(50),
            ..AgentConfig::default()
        },
    );
    let (shutdown, rx) = watch::channel(false);
    tokio::spawn(async move { agent.run(rx).await });

    let app = server::create_app(state, get_metrics_handle());
    TestServer {
        app,
        _shutdown: shutdown,
    }
}

async fn get(app: &axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

async fn post(
    app: &axum::Router,
    uri: &str,
    content_type: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", content_type)
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn station_batch() -> serde_json::Value {
    serde_json::json!({
        "records": [{
            "key": 40850,
            "value": {
                "stop_id": 30004,
                "direction_id": "E",
                "stop_name": "Harlem (Forest Pk-bound)",
                "station_name": "Harlem/Lake",
                "station_descriptive_name": "Harlem/Lake (Green Line)",
                "station_id": 40850,
                "order": 1,
                "red": false,
                "blue": true,
                "green": false
            }
        }]
    })
}

async fn wait_for_station(app: &axum::Router, id: i64) -> serde_json::Value {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let (status, body) = get(app, &format!("/stations/{id}")).await;
            if status == StatusCode::OK {
                return body;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("station never appeared in the view")
}

#[tokio::test]
async fn test_health_check() {
    let server = setup().await;

    let (status, body) = get(&server.app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_metrics_endpoint_renders() {
    let server = setup().await;

    let response = server
        .app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_ingest_transform_and_lookup() {
    let server = setup().await;

    let (status, body) = post(
        &server.app,
        &format!("/topics/{INPUT}"),
        "application/vnd.kafka.json.v2+json",
        station_batch(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offsets"][0]["offset"], 0);

    let station = wait_for_station(&server.app, 40850).await;
    assert_eq!(
        station,
        serde_json::json!({
            "station_id": 40850,
            "station_name": "Harlem/Lake",
            "order": 1,
            "line": "blue"
        })
    );

    let (status, list) = get(&server.app, "/stations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_plain_json_content_type_is_accepted() {
    let server = setup().await;

    let (status, _) = post(
        &server.app,
        &format!("/topics/{INPUT}"),
        "application/json",
        station_batch(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_station_is_404() {
    let server = setup().await;

    let (status, body) = get(&server.app, "/stations/99999").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99999"));
}

#[tokio::test]
async fn test_wrong_content_type_is_415() {
    let server = setup().await;

    let (status, _) = post(
        &server.app,
        &format!("/topics/{INPUT}"),
        "text/plain",
        station_batch(),
    )
    .await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_publish_to_missing_topic_is_404() {
    let server = setup().await;

    let (status, _) = post(
        &server.app,
        "/topics/no.such.channel",
        "application/vnd.kafka.json.v2+json",
        station_batch(),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_batch_is_400() {
    let server = setup().await;

    let (status, _) = post(
        &server.app,
        &format!("/topics/{INPUT}"),
        "application/vnd.kafka.json.v2+json",
        serde_json::json!({"not_records": []}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_topic_is_idempotent() {
    let server = setup().await;
    let spec = serde_json::json!({
        "name": "org.chicago.cta.weather",
        "partitions": 3,
        "replication_factor": 1
    });

    let (first, _) = post(&server.app, "/topics", "application/json", spec.clone()).await;
    let (second, _) = post(&server.app, "/topics", "application/json", spec.clone()).await;
    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);

    // The provisioned channel accepts records.
    let (status, _) = post(
        &server.app,
        "/topics/org.chicago.cta.weather",
        "application/vnd.kafka.json.v2+json",
        serde_json::json!({
            "records": [{
                "key": {"timestamp": 1_700_000_000_000i64},
                "value": {"temperature": 70.0, "status": "sunny"}
            }]
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_impossible_replication_factor_is_422() {
    let server = setup().await;

    let (status, body) = post(
        &server.app,
        "/topics",
        "application/json",
        serde_json::json!({
            "name": "org.chicago.cta.weather",
            "partitions": 3,
            "replication_factor": 3
        }),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("Replication factor")
    );
}
