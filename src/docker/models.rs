//! Conversions from the Docker Engine API models into the exporter's own types.
//!
//! Every field of the API models is optional; anything the daemon leaves out
//! becomes zero or empty, the same way a `null` section decodes in [`RawStats`].
use bollard::models::{
    ContainerBlkioStatEntry, ContainerBlkioStats, ContainerCpuStats, ContainerMemoryStats,
    ContainerNetworkStats, ContainerPidsStats, ContainerStatsResponse, ContainerSummary,
};

use crate::container::{self, ContainerID, ContainerInfo, ContainerState};
use crate::stats::{
    BlkioEntry, BlkioStats, CpuStats, CpuUsage, MemoryStats, NetworkStats, PidsStats, RawStats,
};

impl TryFrom<ContainerSummary> for ContainerInfo {
    type Error = container::Error;

    fn try_from(value: ContainerSummary) -> Result<Self, Self::Error> {
        let state = value.state.map(|state| state.to_string()).unwrap_or_default();
        Ok(ContainerInfo::new(
            ContainerID::new(value.id.as_deref().unwrap_or_default())?,
            value.names.unwrap_or_default(),
            ContainerState::from(state.as_str()),
        ))
    }
}

impl From<ContainerStatsResponse> for RawStats {
    fn from(value: ContainerStatsResponse) -> Self {
        Self {
            cpu_stats: value.cpu_stats.map(CpuStats::from).unwrap_or_default(),
            precpu_stats: value.precpu_stats.map(CpuStats::from).unwrap_or_default(),
            memory_stats: value.memory_stats.map(MemoryStats::from).unwrap_or_default(),
            networks: value
                .networks
                .unwrap_or_default()
                .into_iter()
                .map(|(interface, stats)| (interface, NetworkStats::from(stats)))
                .collect(),
            blkio_stats: value.blkio_stats.map(BlkioStats::from).unwrap_or_default(),
            pids_stats: value.pids_stats.map(PidsStats::from).unwrap_or_default(),
        }
    }
}

impl From<ContainerCpuStats> for CpuStats {
    fn from(value: ContainerCpuStats) -> Self {
        Self {
            cpu_usage: CpuUsage {
                total_usage: value
                    .cpu_usage
                    .and_then(|usage| usage.total_usage)
                    .unwrap_or_default(),
            },
            system_cpu_usage: value.system_cpu_usage.unwrap_or_default(),
        }
    }
}

impl From<ContainerMemoryStats> for MemoryStats {
    fn from(value: ContainerMemoryStats) -> Self {
        Self {
            usage: value.usage.unwrap_or_default(),
            limit: value.limit.unwrap_or_default(),
            stats: value.stats.unwrap_or_default().into_iter().collect(),
        }
    }
}

impl From<ContainerNetworkStats> for NetworkStats {
    fn from(value: ContainerNetworkStats) -> Self {
        Self {
            rx_bytes: value.rx_bytes.unwrap_or_default(),
            tx_bytes: value.tx_bytes.unwrap_or_default(),
        }
    }
}

impl From<ContainerBlkioStats> for BlkioStats {
    fn from(value: ContainerBlkioStats) -> Self {
        Self {
            io_service_bytes_recursive: value
                .io_service_bytes_recursive
                .unwrap_or_default()
                .into_iter()
                .map(BlkioEntry::from)
                .collect(),
        }
    }
}

impl From<ContainerBlkioStatEntry> for BlkioEntry {
    fn from(value: ContainerBlkioStatEntry) -> Self {
        Self {
            major: value.major.unwrap_or_default(),
            minor: value.minor.unwrap_or_default(),
            op: value.op.unwrap_or_default(),
            value: value.value.unwrap_or_default(),
        }
    }
}

impl From<ContainerPidsStats> for PidsStats {
    fn from(value: ContainerPidsStats) -> Self {
        Self {
            current: value.current.unwrap_or_default(),
        }
    }
}
