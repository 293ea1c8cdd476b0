//! Dex Exporter: exposes Docker container resource usage as Prometheus metrics.
//!
//! Every scrape of `/metrics` lists the containers known to the Docker daemon,
//! fetches a stats snapshot for each running container concurrently, normalizes
//! the cgroup v1/v2 specific values and renders the resulting `dex_*` metrics.
use std::sync::Arc;

pub mod api;
pub mod collector;
pub mod config;
pub mod container;
pub mod docker;
pub mod error;
pub mod metrics;
pub mod runtime;
pub mod stats;

/// Runs the exporter until SIGINT or SIGTERM.
///
/// # Errors
///
/// Possible errors include:
/// - Invalid configuration in the environment (see [`config`]).
/// - A malformed `DOCKER_HOST` or unreadable TLS material.
/// - Failure to bind the listen address.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::Config::from_env()?;
    log::debug!("Configuration: {:?}", config);

    let client = Arc::new(docker::DockerClient::connect_with_defaults().await?);

    let collector = collector::Collector::new(Arc::clone(&client), config.collector_options());
    let api = api::APIServer::new(collector);
    api.listen(config.listen_addr, shutdown_signal()).await?;

    log::info!("Shut down, closing docker client");
    drop(client);
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("failed to listen for SIGINT: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("Received shutdown signal");
}
