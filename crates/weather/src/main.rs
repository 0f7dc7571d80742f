//! Weather producer entry point.

use chrono::Datelike;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use weather::{GatewayClient, WeatherConfig, WeatherModel, WeatherProducer};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, stopping weather producer");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, stopping weather producer");
        }
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = WeatherConfig::from_env();
    let month = config
        .month
        .unwrap_or_else(|| chrono::Utc::now().month0());

    let gateway = GatewayClient::new(config.gateway_url.clone());
    let mut producer = WeatherProducer::new(gateway, config.channel_spec());
    let mut model = WeatherModel::new(month);
    let mut rng = StdRng::from_entropy();

    tracing::info!(
        gateway = %config.gateway_url,
        channel = %config.channel,
        month,
        "weather producer started"
    );

    let mut ticker = tokio::time::interval(std::time::Duration::from_millis(
        config.emit_interval_ms,
    ));
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => break,
            _ = ticker.tick() => {
                match producer.emit(&mut model, &mut rng).await {
                    Ok(()) => {}
                    Err(err) if !producer.is_provisioned() => {
                        // Provisioning failures are configuration errors;
                        // there is no point retrying them every tick.
                        tracing::error!(error = %err, "failed to provision weather channel");
                        std::process::exit(1);
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "failed to publish weather reading");
                    }
                }
            }
        }
    }

    tracing::info!("weather producer shut down");
}
