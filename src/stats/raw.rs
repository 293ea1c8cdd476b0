//! Raw statistics snapshot as returned by the Docker Engine `/containers/{id}/stats` endpoint.
//!
//! Only the sections the normalizer consumes are modelled. Docker omits or nulls
//! whole sections depending on platform and cgroup version (e.g. `blkio_stats`
//! lists are `null` on cgroup v2 hosts without I/O, `networks` is absent for
//! `--network host`), so every field falls back to its default instead of
//! failing the decode.
//!
//! # Example
//!
//! ```rust
//! use dex_exporter::stats::RawStats;
//!
//! let raw: RawStats = serde_json::from_str(r#"{
//!     "cpu_stats": {"cpu_usage": {"total_usage": 1100}, "system_cpu_usage": 20100},
//!     "precpu_stats": {"cpu_usage": {"total_usage": 1000}, "system_cpu_usage": 20000},
//!     "memory_stats": {"usage": 4096, "limit": 8192, "stats": {"file": 1024}},
//!     "blkio_stats": {"io_service_bytes_recursive": null},
//!     "pids_stats": {"current": 3}
//! }"#).unwrap();
//!
//! assert_eq!(raw.cpu_stats.cpu_usage.total_usage, 1100);
//! assert!(raw.networks.is_empty());
//! assert!(raw.blkio_stats.io_service_bytes_recursive.is_empty());
//! ```

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};

/// Deserializes `null` the same way as a missing field.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct RawStats {
    #[serde(default, deserialize_with = "nullable")]
    pub cpu_stats: CpuStats,
    #[serde(default, deserialize_with = "nullable")]
    pub precpu_stats: CpuStats,
    #[serde(default, deserialize_with = "nullable")]
    pub memory_stats: MemoryStats,
    /// Per-interface counters keyed by interface name (e.g. `eth0`).
    #[serde(default, deserialize_with = "nullable")]
    pub networks: HashMap<String, NetworkStats>,
    #[serde(default, deserialize_with = "nullable")]
    pub blkio_stats: BlkioStats,
    #[serde(default, deserialize_with = "nullable")]
    pub pids_stats: PidsStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CpuStats {
    #[serde(default, deserialize_with = "nullable")]
    pub cpu_usage: CpuUsage,
    /// Host-wide CPU time in nanoseconds.
    #[serde(default, deserialize_with = "nullable")]
    pub system_cpu_usage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CpuUsage {
    /// Container CPU time in nanoseconds.
    #[serde(default, deserialize_with = "nullable")]
    pub total_usage: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct MemoryStats {
    #[serde(default, deserialize_with = "nullable")]
    pub usage: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub limit: u64,
    /// Contents of the cgroup's `memory.stat`; key names depend on the cgroup version.
    #[serde(default, deserialize_with = "nullable")]
    pub stats: HashMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct NetworkStats {
    #[serde(default, deserialize_with = "nullable")]
    pub rx_bytes: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub tx_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct BlkioStats {
    #[serde(default, deserialize_with = "nullable")]
    pub io_service_bytes_recursive: Vec<BlkioEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct BlkioEntry {
    #[serde(default)]
    pub major: u64,
    #[serde(default)]
    pub minor: u64,
    #[serde(default)]
    pub op: String,
    #[serde(default)]
    pub value: u64,
}

impl BlkioEntry {
    pub fn new(op: impl Into<String>, value: u64) -> Self {
        Self {
            op: op.into(),
            value,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PidsStats {
    #[serde(default, deserialize_with = "nullable")]
    pub current: u64,
}
