//! One collection cycle: list containers, fetch and normalize their stats
//! concurrently, and aggregate everything into a single batch of metric points.
//!
//! The collector keeps no state between cycles. Concurrent scrapes each run
//! their own cycle against the shared, immutable runtime client.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::container::ContainerID;
use crate::error::LogOnErr;
use crate::metrics::{self, MetricPoint};
use crate::runtime::RuntimeClient;
use crate::stats::{self, NetworkSelection};

pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 16;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
enum FetchError<E>
where
    E: std::error::Error + 'static,
{
    #[error("can't read stats of container `{container}`")]
    Runtime {
        container: String,
        #[source]
        source: E,
    },
    #[error("reading stats of container `{container}` timed out after {after:?}")]
    Timeout { container: String, after: Duration },
}

#[derive(Debug, Clone)]
pub struct CollectorOptions {
    pub network: NetworkSelection,
    /// Upper bound of in-flight stats requests within one cycle.
    pub max_concurrent_fetches: usize,
    pub fetch_timeout: Duration,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            network: NetworkSelection::default(),
            max_concurrent_fetches: DEFAULT_MAX_CONCURRENT_FETCHES,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }
}

/// Produces the metric batch served on each scrape.
#[derive(Debug)]
pub struct Collector<C> {
    client: Arc<C>,
    network: Arc<NetworkSelection>,
    max_concurrent_fetches: usize,
    fetch_timeout: Duration,
}

impl<C> Clone for Collector<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            network: Arc::clone(&self.network),
            max_concurrent_fetches: self.max_concurrent_fetches,
            fetch_timeout: self.fetch_timeout,
        }
    }
}

impl<C: RuntimeClient> Collector<C> {
    pub fn new(client: Arc<C>, options: CollectorOptions) -> Self {
        Self {
            client,
            network: Arc::new(options.network),
            max_concurrent_fetches: options
                .max_concurrent_fetches
                .clamp(1, Semaphore::MAX_PERMITS),
            fetch_timeout: options.fetch_timeout,
        }
    }

    /// Runs one collection cycle.
    ///
    /// Never fails: a failed listing yields an empty batch and a failed
    /// container only loses its derived points. Every per-container task is
    /// joined before the batch is returned.
    pub async fn collect(&self) -> Vec<MetricPoint> {
        let containers = match self.client.list_containers(true).await {
            Ok(containers) => containers,
            Err(err) => {
                log::error!("can't list containers: {}", err);
                return Vec::new();
            }
        };
        log::trace!("collecting stats of {} containers", containers.len());

        let permits = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let mut tasks = JoinSet::new();
        let mut out = Vec::with_capacity(containers.len());

        for container in containers {
            let name = container.normalized_name();
            let running = container.is_running();
            out.push(metrics::running_point(&name, running));

            if running {
                tasks.spawn(container_points(
                    Arc::clone(&self.client),
                    Arc::clone(&permits),
                    Arc::clone(&self.network),
                    self.fetch_timeout,
                    container.id,
                    name,
                ));
            }
        }

        while let Some(result) = tasks.join_next().await {
            if let Some(points) = result.log_err("container task failed").flatten() {
                out.extend(points);
            }
        }

        out
    }
}

/// Fetches, normalizes and converts the stats of one running container.
///
/// Returns `None` if the stats could not be obtained; the error is logged.
async fn container_points<C: RuntimeClient>(
    client: Arc<C>,
    permits: Arc<Semaphore>,
    network: Arc<NetworkSelection>,
    fetch_timeout: Duration,
    container_id: ContainerID,
    name: String,
) -> Option<Vec<MetricPoint>> {
    let _permit = permits
        .acquire_owned()
        .await
        .log_err("can't acquire fetch permit")?;

    let raw = match tokio::time::timeout(fetch_timeout, client.fetch_stats(&container_id)).await
    {
        Ok(result) => result.map_err(|source| FetchError::Runtime {
            container: name.clone(),
            source,
        }),
        Err(_) => Err(FetchError::Timeout {
            container: name.clone(),
            after: fetch_timeout,
        }),
    }
    .log_err("skipping container")?;

    let normalized = stats::normalize(&raw, &network);
    for warning in &normalized.warnings {
        log::warn!("container={}: {}", name, warning);
    }

    Some(metrics::derived_points(&name, &normalized))
}
