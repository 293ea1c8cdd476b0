use super::raw::CpuStats;
use super::{DataQualityWarning, percent};

const NANOS_PER_SECOND: f64 = 1e9;

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Cpu {
    /// Share of host CPU time used by the container between the two samples.
    pub utilization_percent: f64,
    /// Cumulative container CPU time.
    pub total_seconds: f64,
}

/// Derives CPU utilization from the current and the previous sample.
///
/// Counter regressions (e.g. after a container restart) saturate to a zero delta.
pub(super) fn derive(
    current: &CpuStats,
    previous: &CpuStats,
    warnings: &mut Vec<DataQualityWarning>,
) -> Cpu {
    let cpu_delta = current
        .cpu_usage
        .total_usage
        .saturating_sub(previous.cpu_usage.total_usage);
    let system_delta = current
        .system_cpu_usage
        .saturating_sub(previous.system_cpu_usage);

    let utilization_percent = percent(cpu_delta, system_delta).unwrap_or_else(|| {
        warnings.push(DataQualityWarning::ZeroSystemCpuDelta);
        0.0
    });

    Cpu {
        utilization_percent,
        total_seconds: current.cpu_usage.total_usage as f64 / NANOS_PER_SECOND,
    }
}
