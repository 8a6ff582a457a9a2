//! Cache Statistics Module
//!
//! Tracks hits, misses and invalidations per partition and derives the
//! aggregate snapshot returned by `get_cache_stats`.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::Partition;

// == Partition Counters ==
/// Activity counters of one partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PartitionCounters {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that found nothing or an expired entry
    pub misses: u64,
    /// Entries removed by write-triggered invalidation
    pub invalidations: u64,
}

impl PartitionCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_invalidations(&mut self, count: u64) {
        self.invalidations += count;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Counters plus current occupancy of one partition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PartitionStats {
    pub entries: usize,
    #[serde(flatten)]
    pub counters: PartitionCounters,
}

// == Cache Stats ==
/// Point-in-time cache snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// False when caching is switched off; every counter is then zero
    pub enabled: bool,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    /// hits + misses
    pub total_requests: u64,
    /// `100 * hits / total_requests`, two decimals, 0 with no requests
    pub hit_rate_percent: f64,
    /// Live entries per partition
    pub cache_sizes: BTreeMap<Partition, usize>,
    pub partitions: BTreeMap<Partition, PartitionStats>,
}

impl CacheStats {
    /// Snapshot reported when caching is disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Aggregates per-partition figures into a snapshot.
    pub fn from_partitions(partitions: impl IntoIterator<Item = (Partition, PartitionStats)>) -> Self {
        let partitions: BTreeMap<Partition, PartitionStats> = partitions.into_iter().collect();

        let mut stats = Self {
            enabled: true,
            ..Self::default()
        };
        for (partition, p) in &partitions {
            stats.hits += p.counters.hits;
            stats.misses += p.counters.misses;
            stats.invalidations += p.counters.invalidations;
            stats.cache_sizes.insert(*partition, p.entries);
        }
        stats.total_requests = stats.hits + stats.misses;
        stats.hit_rate_percent = hit_rate_percent(stats.hits, stats.misses);
        stats.partitions = partitions;
        stats
    }
}

// == Hit Rate ==
/// Percentage of lookups served from cache, rounded to two decimals.
///
/// Returns 0.0 when no lookups have happened.
pub fn hit_rate_percent(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        return 0.0;
    }
    let rate = hits as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}
