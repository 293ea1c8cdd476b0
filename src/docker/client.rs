use bollard::Docker;
use bollard::query_parameters::{ListContainersOptions, StatsOptions};
use futures::StreamExt;

use super::error::{Error, Result};
use crate::container::{ContainerID, ContainerInfo};
use crate::runtime::RuntimeClient;
use crate::stats::RawStats;

/// Docker Engine API client backed by [`bollard`].
///
/// [`Docker`] pools its connections internally, so one client is shared by
/// every concurrent collection cycle.
#[derive(Debug, Clone)]
pub struct DockerClient {
    docker: Docker,
}

impl DockerClient {
    pub fn new(docker: Docker) -> Self {
        Self { docker }
    }

    /// Connects the way the `docker` CLI does: `DOCKER_HOST` selects a unix
    /// socket or a tcp endpoint, `DOCKER_TLS_VERIFY` and `DOCKER_CERT_PATH`
    /// enable TLS, and the local socket is used when nothing is set.
    ///
    /// The API version is negotiated with the daemon. An unreachable daemon is
    /// not an error here: scrapes report empty batches until it comes up.
    pub async fn connect_with_defaults() -> Result<Self> {
        let docker = Docker::connect_with_defaults().map_err(Error::Connect)?;
        let docker = match docker.clone().negotiate_version().await {
            Ok(negotiated) => negotiated,
            Err(err) => {
                log::warn!(
                    "can't negotiate the docker API version, keeping the default: {}",
                    err
                );
                docker
            }
        };
        Ok(Self::new(docker))
    }
}

impl RuntimeClient for DockerClient {
    type Error = Error;

    async fn list_containers(&self, include_stopped: bool) -> Result<Vec<ContainerInfo>> {
        let options = ListContainersOptions {
            all: include_stopped,
            ..Default::default()
        };
        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(Error::List)?;

        Ok(summaries
            .into_iter()
            .filter_map(|summary| match ContainerInfo::try_from(summary) {
                Ok(info) => Some(info),
                Err(err) => {
                    log::warn!("skipping container listing entry: {}", err);
                    None
                }
            })
            .collect())
    }

    async fn fetch_stats(&self, container_id: &ContainerID) -> Result<RawStats> {
        let options = StatsOptions {
            stream: false,
            ..Default::default()
        };
        let mut samples = std::pin::pin!(self.docker.stats(container_id.as_ref(), Some(options)));

        match samples.next().await {
            Some(Ok(response)) => Ok(RawStats::from(response)),
            Some(Err(source)) => Err(Error::Stats {
                container: container_id.to_string(),
                source,
            }),
            None => Err(Error::EmptyStats {
                container: container_id.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::Json;
    use axum::extract::{Path, Query};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;

    use super::*;

    #[derive(Debug, serde::Deserialize)]
    struct ListParams {
        #[serde(default)]
        all: bool,
    }

    async fn list(Query(params): Query<ListParams>) -> Json<serde_json::Value> {
        let mut containers = vec![serde_json::json!({
            "Id": "aaaa", "Names": ["/web"], "State": "running"
        })];
        if params.all {
            containers.push(serde_json::json!({
                "Id": "bbbb", "Names": ["/old"], "State": "exited"
            }));
            containers.push(serde_json::json!({
                "Id": "", "Names": ["/half-created"], "State": "created"
            }));
        }
        Json(serde_json::Value::Array(containers))
    }

    async fn stats(Path((_version, id)): Path<(String, String)>) -> Response {
        match id.as_str() {
            "aaaa" => Json(serde_json::json!({
                "cpu_stats": {"cpu_usage": {"total_usage": 1100}, "system_cpu_usage": 20100},
                "precpu_stats": {"cpu_usage": {"total_usage": 1000}, "system_cpu_usage": 20000},
                "memory_stats": {"usage": 300, "limit": 1000, "stats": {"file": 100}},
                "networks": {"eth0": {"rx_bytes": 5, "tx_bytes": 6}},
                "blkio_stats": {"io_service_bytes_recursive": null},
                "pids_stats": {"current": 2}
            }))
            .into_response(),
            "garbage" => (StatusCode::OK, "not json").into_response(),
            _ => (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"message": format!("No such container: {id}")})),
            )
                .into_response(),
        }
    }

    fn connect(socket: &std::path::Path) -> DockerClient {
        let docker = Docker::connect_with_unix(
            socket.to_str().unwrap(),
            5,
            bollard::API_DEFAULT_VERSION,
        )
        .unwrap();
        DockerClient::new(docker)
    }

    async fn spawn_fake_daemon() -> (tempfile::TempDir, DockerClient) {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("docker.sock");
        let listener = tokio::net::UnixListener::bind(&socket).unwrap();
        let router = axum::Router::new()
            .route("/{version}/containers/json", get(list))
            .route("/{version}/containers/{id}/stats", get(stats));
        tokio::spawn(async move { axum::serve(listener, router).await });
        let client = connect(&socket);
        (dir, client)
    }

    #[tokio::test]
    async fn test_list_containers() {
        let (_dir, client) = spawn_fake_daemon().await;

        let running = client.list_containers(false).await.unwrap();
        assert_eq!(running.len(), 1);
        assert_eq!(running[0].normalized_name(), "web");

        let all = client.list_containers(true).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(!all[1].is_running());
    }

    #[tokio::test]
    async fn test_list_containers_skips_invalid_entries() {
        let (_dir, client) = spawn_fake_daemon().await;

        let all = client.list_containers(true).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|info| info.id.as_ref()).collect();
        assert_eq!(ids, vec!["aaaa", "bbbb"]);
    }

    #[tokio::test]
    async fn test_fetch_stats() {
        let (_dir, client) = spawn_fake_daemon().await;

        let raw = client
            .fetch_stats(&ContainerID::new("aaaa").unwrap())
            .await
            .unwrap();
        assert_eq!(raw.cpu_stats.cpu_usage.total_usage, 1100);
        assert_eq!(raw.memory_stats.stats.get("file"), Some(&100));
        assert_eq!(raw.networks["eth0"].tx_bytes, 6);
        assert!(raw.blkio_stats.io_service_bytes_recursive.is_empty());
        assert_eq!(raw.pids_stats.current, 2);
    }

    #[tokio::test]
    async fn test_fetch_stats_not_found() {
        let (_dir, client) = spawn_fake_daemon().await;

        let err = client
            .fetch_stats(&ContainerID::new("missing").unwrap())
            .await
            .unwrap_err();
        match err {
            Error::Stats {
                container,
                source:
                    bollard::errors::Error::DockerResponseServerError {
                        status_code,
                        message,
                    },
            } => {
                assert_eq!(container, "missing");
                assert_eq!(status_code, 404);
                assert_eq!(message, "No such container: missing");
            }
            other => panic!("Expected a 404 stats error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_stats_undecodable_body() {
        let (_dir, client) = spawn_fake_daemon().await;

        let err = client
            .fetch_stats(&ContainerID::new("garbage").unwrap())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Stats { .. } | Error::EmptyStats { .. }
        ));
    }

    #[tokio::test]
    async fn test_unreachable_socket() {
        let dir = tempfile::tempdir().unwrap();
        let stale = dir.path().join("stale.sock");
        std::fs::write(&stale, b"").unwrap();
        let client = connect(&stale);

        let err = client.list_containers(true).await.unwrap_err();
        assert!(matches!(err, Error::List(_)));
    }
}
