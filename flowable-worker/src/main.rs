//! Flowable Worker
//!
//! Subscribes to the configured topics of an engine's external job API and
//! runs every acquired job through the sample [`EchoHandler`].
//!
//! One polling task is spawned per topic. All tasks share a single client
//! whose transport and credentials are fixed before the first task starts.
//! Ctrl-C signals every subscription to stop after its current cycle.

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flowable_client::ExternalWorkerClient;
use flowable_worker::{Config, EchoHandler, JobHandler, Subscription};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flowable_worker=info,flowable_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Flowable external worker");

    let config = load_config()?;
    info!(
        "Loaded configuration: worker_id={}, engine_url={}, topics={:?}",
        config.worker_id, config.engine_url, config.topics
    );

    let client = ExternalWorkerClient::http(config.engine_url.clone(), config.transport_config());
    let handler: Arc<dyn JobHandler> = Arc::new(EchoHandler::new(config.worker_id.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut handles = Vec::new();

    for request in config.subscriptions() {
        let subscription = Subscription::new(request, client.clone(), Arc::clone(&handler));
        let shutdown = shutdown_rx.clone();
        handles.push(tokio::spawn(async move { subscription.run(shutdown).await }));
    }

    info!(
        "Started {} subscription(s), poll interval {:?}",
        handles.len(),
        config.poll_interval
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    info!("Shutdown requested, stopping subscriptions");
    let _ = shutdown_tx.send(true);

    for handle in handles {
        if let Err(e) = handle.await {
            warn!("Subscription task panicked: {}", e);
        }
    }

    info!("Worker stopped");
    Ok(())
}

/// Loads and validates configuration from environment variables
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
