//! Normalization of raw runtime statistics into emission-ready values.
//!
//! The runtime hands us cumulative counters and cgroup-version dependent
//! accounting keys. This module turns one [`RawStats`] snapshot into a
//! [`NormalizedMetrics`] value without performing any I/O:
//!
//! - [`cpu`]: utilization percent from the delta between two samples, total CPU seconds.
//! - [`memory`]: usage minus kernel page cache (`cache` on cgroup v1, `file` on cgroup v2).
//! - [`net`]: received/transmitted bytes for all or one selected interface.
//! - [`io`]: read/write byte totals from the block I/O service list.
//!
//! Conditions that make a value meaningless (zero denominators, missing
//! accounting keys, a missing interface) never fail the normalization. The
//! affected value falls back to a sentinel and a [`DataQualityWarning`] is
//! recorded on the result for the caller to log.
//!
//! # Example
//!
//! ```rust
//! use dex_exporter::stats::{normalize, NetworkSelection, RawStats};
//!
//! let mut raw = RawStats::default();
//! raw.cpu_stats.cpu_usage.total_usage = 1100;
//! raw.precpu_stats.cpu_usage.total_usage = 1000;
//! raw.cpu_stats.system_cpu_usage = 20100;
//! raw.precpu_stats.system_cpu_usage = 20000;
//!
//! let metrics = normalize(&raw, &NetworkSelection::AllInterfaces);
//! assert_eq!(metrics.cpu_utilization_percent, 100.0);
//! ```

mod cpu;
mod io;
mod memory;
mod net;
mod raw;

pub use raw::{
    BlkioEntry, BlkioStats, CpuStats, CpuUsage, MemoryStats, NetworkStats, PidsStats, RawStats,
};

/// Which network interfaces contribute to the reported rx/tx counters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NetworkSelection {
    /// Sum the counters of every interface in the snapshot.
    #[default]
    AllInterfaces,
    /// Report only the named interface.
    Interface(String),
}

impl NetworkSelection {
    /// An empty name selects all interfaces.
    pub fn from_interface_name(name: Option<String>) -> Self {
        match name {
            Some(name) if !name.trim().is_empty() => Self::Interface(name.trim().to_owned()),
            _ => Self::AllInterfaces,
        }
    }
}

/// A recoverable data-quality problem found while normalizing one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DataQualityWarning {
    #[error("system CPU usage did not advance between samples; reporting 0% CPU utilization")]
    ZeroSystemCpuDelta,
    #[error(
        "could not find \"cache\" stat (cgroup v1) nor \"file\" stat (cgroup v2); memory usage includes page cache"
    )]
    MissingCacheStat,
    #[error("memory limit is 0; reporting 0% memory utilization")]
    ZeroMemoryLimit,
    #[error("network interface `{0}` not present in stats; reporting 0 bytes")]
    MissingNetworkInterface(String),
}

/// Derived, emission-ready values for one running container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedMetrics {
    pub running: bool,
    pub cpu_utilization_percent: f64,
    pub cpu_total_seconds: f64,
    pub memory_usage_bytes: u64,
    pub memory_total_bytes: u64,
    pub memory_utilization_percent: f64,
    pub network_rx_bytes: u64,
    pub network_tx_bytes: u64,
    pub block_read_bytes: u64,
    pub block_write_bytes: u64,
    pub pids_current: u64,
    pub warnings: Vec<DataQualityWarning>,
}

/// Normalizes a stats snapshot of a running container.
///
/// Pure: the same input always yields an identical result.
pub fn normalize(raw: &RawStats, network: &NetworkSelection) -> NormalizedMetrics {
    let mut warnings = Vec::new();

    let cpu = cpu::derive(&raw.cpu_stats, &raw.precpu_stats, &mut warnings);
    let memory = memory::derive(&raw.memory_stats, &mut warnings);
    let network = net::derive(&raw.networks, network, &mut warnings);
    let io = io::derive(&raw.blkio_stats.io_service_bytes_recursive);

    NormalizedMetrics {
        running: true,
        cpu_utilization_percent: cpu.utilization_percent,
        cpu_total_seconds: cpu.total_seconds,
        memory_usage_bytes: memory.usage_bytes,
        memory_total_bytes: memory.total_bytes,
        memory_utilization_percent: memory.utilization_percent,
        network_rx_bytes: network.rx_bytes,
        network_tx_bytes: network.tx_bytes,
        block_read_bytes: io.read_bytes,
        block_write_bytes: io.write_bytes,
        pids_current: raw.pids_stats.current,
        warnings,
    }
}

/// `numerator / denominator * 100`, or `None` if the denominator is zero.
fn percent(numerator: u64, denominator: u64) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64 * 100.0)
    }
}
