//! Memory usage excluding the kernel page cache.
//!
//! The cgroup's raw usage includes the disk cache, which vastly overestimates
//! the memory a workload actually needs. cgroup v1 reports that cache as the
//! `cache` stat, cgroup v2 as the `file` stat, so whichever is present is
//! subtracted.
//!
//! Further reading:
//!   - <https://docs.kernel.org/admin-guide/cgroup-v1/memory.html#stat-file>
//!   - <https://docs.kernel.org/admin-guide/cgroup-v2.html#memory-interface-files>

use super::raw::MemoryStats;
use super::{DataQualityWarning, percent};

/// Page cache key on cgroup v1 hosts.
const CGROUP_V1_CACHE_KEY: &str = "cache";
/// Page cache key on cgroup v2 hosts.
const CGROUP_V2_CACHE_KEY: &str = "file";

#[derive(Debug, Clone, PartialEq)]
pub(super) struct Memory {
    pub usage_bytes: u64,
    pub total_bytes: u64,
    pub utilization_percent: f64,
}

/// Returns the page cache size, preferring the cgroup v2 key if both are present.
fn page_cache(stats: &MemoryStats) -> Option<u64> {
    stats
        .stats
        .get(CGROUP_V2_CACHE_KEY)
        .or_else(|| stats.stats.get(CGROUP_V1_CACHE_KEY))
        .copied()
}

pub(super) fn derive(stats: &MemoryStats, warnings: &mut Vec<DataQualityWarning>) -> Memory {
    let usage_bytes = match page_cache(stats) {
        Some(cache) => stats.usage.saturating_sub(cache),
        None => {
            warnings.push(DataQualityWarning::MissingCacheStat);
            stats.usage
        }
    };

    let utilization_percent = percent(usage_bytes, stats.limit).unwrap_or_else(|| {
        warnings.push(DataQualityWarning::ZeroMemoryLimit);
        0.0
    });

    Memory {
        usage_bytes,
        total_bytes: stats.limit,
        utilization_percent,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn stats(usage: u64, limit: u64, keys: &[(&str, u64)]) -> MemoryStats {
        MemoryStats {
            usage,
            limit,
            stats: keys
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn test_cgroup_v1_subtracts_cache() {
        let mut warnings = Vec::new();
        let memory = derive(
            &stats(1000, 4000, &[("cache", 200), ("rss", 800)]),
            &mut warnings,
        );
        assert_eq!(memory.usage_bytes, 800);
        assert_eq!(memory.total_bytes, 4000);
        assert_eq!(memory.utilization_percent, 20.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_cgroup_v2_subtracts_file() {
        let mut warnings = Vec::new();
        let memory = derive(
            &stats(1000, 2000, &[("file", 600), ("anon", 400)]),
            &mut warnings,
        );
        assert_eq!(memory.usage_bytes, 400);
        assert_eq!(memory.utilization_percent, 20.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_file_wins_when_both_keys_present() {
        let mut warnings = Vec::new();
        let memory = derive(
            &stats(1000, 2000, &[("cache", 100), ("file", 300)]),
            &mut warnings,
        );
        assert_eq!(memory.usage_bytes, 700);
    }

    #[test]
    fn test_missing_cache_keys_uses_raw_usage() {
        let mut warnings = Vec::new();
        let memory = derive(&stats(1000, 2000, &[("anon", 1000)]), &mut warnings);
        assert_eq!(memory.usage_bytes, 1000);
        assert_eq!(memory.utilization_percent, 50.0);
        assert_eq!(warnings, vec![DataQualityWarning::MissingCacheStat]);
    }

    #[test]
    fn test_zero_limit_is_guarded() {
        let mut warnings = Vec::new();
        let memory = derive(&stats(1000, 0, &[("file", 10)]), &mut warnings);
        assert_eq!(memory.utilization_percent, 0.0);
        assert_eq!(memory.total_bytes, 0);
        assert_eq!(warnings, vec![DataQualityWarning::ZeroMemoryLimit]);
    }

    #[test]
    fn test_cache_larger_than_usage_saturates() {
        let mut warnings = Vec::new();
        let memory = derive(&stats(100, 1000, &[("cache", 500)]), &mut warnings);
        assert_eq!(memory.usage_bytes, 0);
    }
}
