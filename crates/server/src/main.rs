//! Pipeline server entry point.

use channel::{ChannelSpec, InMemoryBroker};
use pipeline::{AgentConfig, TransformerAgent};
use tokio::signal;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

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
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Create broker and application state
    let config = server::config::Config::from_env();
    let broker = InMemoryBroker::new();
    let (state, table) = server::create_default_state(broker.clone());

    // 4. Provision the pipeline channels. Failures here are fatal
    //    configuration errors.
    state
        .provisioner
        .ensure(&ChannelSpec::new(
            config.input_channel.clone(),
            config.input_partitions,
            1,
        ))
        .await
        .expect("failed to provision input channel");
    state
        .provisioner
        .ensure(&ChannelSpec::new(config.output_channel.clone(), 1, 1).compacted())
        .await
        .expect("failed to provision output channel");

    // 5. Start the transformer agent
    let agent = TransformerAgent::new(
        broker,
        table,
        AgentConfig {
            input_channel: config.input_channel.clone(),
            output_channel: config.output_channel.clone(),
            group: config.group.clone(),
            ..AgentConfig::default()
        },
    );
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let agent_task = tokio::spawn(async move { agent.run(shutdown_rx).await });

    // 6. Build the application and start the server
    let app = server::create_app(state, metrics_handle);
    let addr = config.addr();
    tracing::info!(%addr, "starting pipeline server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    // 7. Stop the agent and surface its exit
    shutdown_tx.send(true).ok();
    match agent_task.await {
        Ok(Ok(())) => tracing::info!("transformer agent stopped cleanly"),
        Ok(Err(err)) => tracing::error!(error = %err, "transformer agent failed"),
        Err(err) => tracing::error!(error = %err, "transformer agent task panicked"),
    }

    tracing::info!("server shut down gracefully");
}
