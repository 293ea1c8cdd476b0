use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tokio::net::ToSocketAddrs;

use crate::collector::Collector;
use crate::metrics;
use crate::runtime::RuntimeClient;

/// Runs one collection cycle per scrape and renders it in the Prometheus text format.
async fn export_metrics<C: RuntimeClient>(State(collector): State<Collector<C>>) -> Response {
    let points = collector.collect().await;
    log::debug!("Collected {} metric points", points.len());

    match metrics::encode_text(&points) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, metrics::TEXT_CONTENT_TYPE)],
            body,
        )
            .into_response(),
        Err(err) => {
            log::error!("Failed to encode metrics: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "failed to encode metrics",
            )
                .into_response()
        }
    }
}

async fn healthz() -> &'static str {
    "ok"
}

pub struct APIServer {
    router: axum::Router,
}

impl APIServer {
    pub fn new<C: RuntimeClient>(collector: Collector<C>) -> Self {
        let router = axum::Router::new()
            .route("/metrics", get(export_metrics::<C>))
            .route("/healthz", get(healthz))
            .with_state(collector);
        Self { router }
    }

    /// Serves until `shutdown` resolves, then finishes in-flight scrapes.
    pub async fn listen(
        self,
        addr: impl ToSocketAddrs,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> std::io::Result<()> {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Serving metrics on http://{}/metrics", listener.local_addr()?);
        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await
    }
}
