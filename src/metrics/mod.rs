//! The metric points emitted for each container and their exposition encoding.
//!
//! Names and kinds form the public contract of the exporter and must not change:
//!
//! | name                                | kind    |
//! |-------------------------------------|---------|
//! | `dex_container_running`             | gauge   |
//! | `dex_cpu_utilization_percent`       | gauge   |
//! | `dex_cpu_utilization_seconds_total` | counter |
//! | `dex_memory_usage_bytes`            | counter |
//! | `dex_memory_total_bytes`            | counter |
//! | `dex_memory_utilization_percent`    | gauge   |
//! | `dex_network_rx_bytes`              | counter |
//! | `dex_network_tx_bytes`              | counter |
//! | `dex_block_io_read_bytes`           | counter |
//! | `dex_block_io_write_bytes`          | counter |
//! | `dex_pids_current`                  | counter |
//!
//! `dex_memory_usage_bytes` and `dex_memory_total_bytes` describe instantaneous
//! values but are exported as counters to stay compatible with existing dashboards.

use std::collections::BTreeMap;

use crate::stats::NormalizedMetrics;

mod encode;

pub use encode::{Error, Result, TEXT_CONTENT_TYPE, encode_text};

/// Label attached to every point.
pub const CONTAINER_NAME_LABEL: &str = "container_name";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// Static description of an exported metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
}

pub const CONTAINER_RUNNING: MetricDesc = MetricDesc {
    name: "dex_container_running",
    help: "1 if docker container is running, 0 otherwise",
    kind: MetricKind::Gauge,
};
pub const CPU_UTILIZATION_PERCENT: MetricDesc = MetricDesc {
    name: "dex_cpu_utilization_percent",
    help: "CPU utilization in percent",
    kind: MetricKind::Gauge,
};
pub const CPU_UTILIZATION_SECONDS_TOTAL: MetricDesc = MetricDesc {
    name: "dex_cpu_utilization_seconds_total",
    help: "Cumulative CPU utilization in seconds",
    kind: MetricKind::Counter,
};
pub const MEMORY_USAGE_BYTES: MetricDesc = MetricDesc {
    name: "dex_memory_usage_bytes",
    help: "Total memory usage bytes",
    kind: MetricKind::Counter,
};
pub const MEMORY_TOTAL_BYTES: MetricDesc = MetricDesc {
    name: "dex_memory_total_bytes",
    help: "Total memory bytes",
    kind: MetricKind::Counter,
};
pub const MEMORY_UTILIZATION_PERCENT: MetricDesc = MetricDesc {
    name: "dex_memory_utilization_percent",
    help: "Memory utilization percent",
    kind: MetricKind::Gauge,
};
pub const NETWORK_RX_BYTES: MetricDesc = MetricDesc {
    name: "dex_network_rx_bytes",
    help: "Network received bytes total",
    kind: MetricKind::Counter,
};
pub const NETWORK_TX_BYTES: MetricDesc = MetricDesc {
    name: "dex_network_tx_bytes",
    help: "Network sent bytes total",
    kind: MetricKind::Counter,
};
pub const BLOCK_IO_READ_BYTES: MetricDesc = MetricDesc {
    name: "dex_block_io_read_bytes",
    help: "Block I/O read bytes",
    kind: MetricKind::Counter,
};
pub const BLOCK_IO_WRITE_BYTES: MetricDesc = MetricDesc {
    name: "dex_block_io_write_bytes",
    help: "Block I/O write bytes",
    kind: MetricKind::Counter,
};
pub const PIDS_CURRENT: MetricDesc = MetricDesc {
    name: "dex_pids_current",
    help: "Current number of pids in the cgroup",
    kind: MetricKind::Counter,
};

/// One sample handed to the metric sink.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub value: f64,
    pub labels: BTreeMap<String, String>,
}

impl MetricPoint {
    pub fn new(desc: MetricDesc, value: f64, container_name: &str) -> Self {
        Self {
            name: desc.name,
            help: desc.help,
            kind: desc.kind,
            value,
            labels: BTreeMap::from([(
                CONTAINER_NAME_LABEL.to_owned(),
                container_name.to_owned(),
            )]),
        }
    }
}

/// The point emitted for every listed container, running or not.
pub fn running_point(container_name: &str, running: bool) -> MetricPoint {
    let value = if running { 1.0 } else { 0.0 };
    MetricPoint::new(CONTAINER_RUNNING, value, container_name)
}

/// The points derived from a running container's normalized stats.
pub fn derived_points(container_name: &str, metrics: &NormalizedMetrics) -> Vec<MetricPoint> {
    [
        (CPU_UTILIZATION_PERCENT, metrics.cpu_utilization_percent),
        (CPU_UTILIZATION_SECONDS_TOTAL, metrics.cpu_total_seconds),
        (MEMORY_USAGE_BYTES, metrics.memory_usage_bytes as f64),
        (MEMORY_TOTAL_BYTES, metrics.memory_total_bytes as f64),
        (MEMORY_UTILIZATION_PERCENT, metrics.memory_utilization_percent),
        (NETWORK_RX_BYTES, metrics.network_rx_bytes as f64),
        (NETWORK_TX_BYTES, metrics.network_tx_bytes as f64),
        (BLOCK_IO_READ_BYTES, metrics.block_read_bytes as f64),
        (BLOCK_IO_WRITE_BYTES, metrics.block_write_bytes as f64),
        (PIDS_CURRENT, metrics.pids_current as f64),
    ]
    .into_iter()
    .map(|(desc, value)| MetricPoint::new(desc, value, container_name))
    .collect()
}
