use crate::container::{ContainerID, ContainerInfo};
use crate::stats::RawStats;

/// The capabilities the collector needs from a container runtime.
///
/// Implementations hold their own connection state and are shared between
/// concurrent collection cycles, hence the `Send + Sync + 'static` bound.
pub trait RuntimeClient: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Lists containers known to the runtime, including stopped ones if `include_stopped` is set.
    fn list_containers(
        &self,
        include_stopped: bool,
    ) -> impl std::future::Future<Output = Result<Vec<ContainerInfo>, Self::Error>> + Send;

    /// Fetches a single, non-streaming stats snapshot for the given container.
    fn fetch_stats(
        &self,
        container_id: &ContainerID,
    ) -> impl std::future::Future<Output = Result<RawStats, Self::Error>> + Send;
}
