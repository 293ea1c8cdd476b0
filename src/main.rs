/// Entry point for the Dex Docker exporter.
///
/// Connects to the Docker daemon (`DOCKER_HOST` or the local socket) and serves container resource
/// metrics for Prometheus on `/metrics`. Configuration is read from the
/// environment, logging is controlled through `RUST_LOG`.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the listen address
/// cannot be bound.
///
/// # Examples
///
/// ```bash
/// RUST_LOG=info DEX_LISTEN_ADDR=0.0.0.0:8080 cargo run
/// ```
#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    dex_exporter::run().await
}
