//! Cache Store Module
//!
//! Partitioned response cache: one HashMap plus LRU tracker per partition,
//! lazy TTL expiry, and the hit/miss/invalidation counters. The store is
//! synchronous; callers share it behind a single mutex.

use std::collections::HashMap;
use std::time::Instant;

use serde_json::Value;

use crate::cache::{
    CacheEntry, CacheStats, Eviction, LruTracker, Partition, PartitionCounters, PartitionPolicy,
    PartitionStats,
};
use crate::config::ClientConfig;

// == Partition Store ==
#[derive(Debug)]
struct PartitionStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    policy: PartitionPolicy,
    counters: PartitionCounters,
}

impl PartitionStore {
    fn new(policy: PartitionPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            policy,
            counters: PartitionCounters::default(),
        }
    }

    fn remove(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            true
        } else {
            false
        }
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.remove(key);
        }
        expired.len()
    }

    fn live_len(&self, now: Instant) -> usize {
        self.entries
            .values()
            .filter(|entry| !entry.is_expired_at(now))
            .count()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.counters.reset();
    }
}

// == Cache Store ==
/// Response cache with one TTL/LRU partition per resource type.
#[derive(Debug)]
pub struct CacheStore {
    partitions: [PartitionStore; 4],
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store, asking `policy` for each partition's TTL and capacity.
    pub fn new(policy: impl Fn(Partition) -> PartitionPolicy) -> Self {
        Self {
            partitions: Partition::ALL.map(|p| PartitionStore::new(policy(p))),
        }
    }

    /// Creates a store with the TTLs and capacity of a client config.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(|p| config.partition_policy(p))
    }

    fn partition(&self, partition: Partition) -> &PartitionStore {
        &self.partitions[partition.index()]
    }

    fn partition_mut(&mut self, partition: Partition) -> &mut PartitionStore {
        &mut self.partitions[partition.index()]
    }

    // == Get ==
    /// Looks up a live entry, recording a hit or a miss.
    ///
    /// An expired entry counts as a miss and is dropped on the spot. A hit
    /// makes the key the most recently used in its partition.
    pub fn get(&mut self, partition: Partition, key: &str) -> Option<Value> {
        let store = self.partition_mut(partition);

        if store.entries.get(key).is_some_and(CacheEntry::is_expired) {
            store.remove(key);
        }

        match store.entries.get(key).map(|entry| entry.value.clone()) {
            Some(value) => {
                store.counters.record_hit();
                store.lru.touch(key);
                Some(value)
            }
            None => {
                store.counters.record_miss();
                None
            }
        }
    }

    // == Put ==
    /// Stores a value, replacing any previous entry for the key.
    ///
    /// A new key entering a full partition first displaces expired entries,
    /// then the least recently used one.
    pub fn put(&mut self, partition: Partition, key: String, value: Value) {
        let store = self.partition_mut(partition);

        if !store.entries.contains_key(&key) && store.entries.len() >= store.policy.max_entries {
            store.purge_expired(Instant::now());
            while store.entries.len() >= store.policy.max_entries {
                match store.lru.evict_oldest() {
                    Some(evicted) => {
                        store.entries.remove(&evicted);
                    }
                    None => break,
                }
            }
        }

        let entry = CacheEntry::new(value, store.policy.ttl);
        store.entries.insert(key.clone(), entry);
        store.lru.touch(&key);
    }

    // == Invalidate ==
    /// Removes one entry. Absent keys are not an error.
    ///
    /// Returns whether an entry was removed; removals are counted as
    /// invalidations.
    pub fn invalidate(&mut self, partition: Partition, key: &str) -> bool {
        let store = self.partition_mut(partition);
        let removed = store.remove(key);
        if removed {
            store.counters.record_invalidations(1);
        }
        removed
    }

    /// Removes every entry whose key starts with `prefix`.
    pub fn invalidate_prefix(&mut self, partition: Partition, prefix: &str) -> usize {
        let store = self.partition_mut(partition);
        let keys: Vec<String> = store
            .entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();

        for key in &keys {
            store.remove(key);
        }
        store.counters.record_invalidations(keys.len() as u64);
        keys.len()
    }

    /// Applies resolved evictions, returning how many entries were removed.
    pub fn apply(&mut self, evictions: &[Eviction]) -> usize {
        evictions
            .iter()
            .map(|eviction| match eviction {
                Eviction::Key { partition, key } => usize::from(self.invalidate(*partition, key)),
                Eviction::Prefix { partition, prefix } => {
                    self.invalidate_prefix(*partition, prefix)
                }
            })
            .sum()
    }

    // == Clear ==
    /// Empties one partition, or all of them, and resets their counters.
    pub fn clear(&mut self, partition: Option<Partition>) {
        match partition {
            Some(p) => self.partition_mut(p).clear(),
            None => self.partitions.iter_mut().for_each(PartitionStore::clear),
        }
    }

    // == Cleanup Expired ==
    /// Physically removes every expired entry. Returns the number removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        self.partitions
            .iter_mut()
            .map(|store| store.purge_expired(now))
            .sum()
    }

    /// Number of live entries in a partition.
    pub fn len(&self, partition: Partition) -> usize {
        self.partition(partition).live_len(Instant::now())
    }

    pub fn is_empty(&self) -> bool {
        Partition::ALL.iter().all(|p| self.len(*p) == 0)
    }

    // == Stats ==
    /// Snapshot of counters and occupancy.
    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        CacheStats::from_partitions(Partition::ALL.map(|p| {
            let store = self.partition(p);
            (
                p,
                PartitionStats {
                    entries: store.live_len(now),
                    counters: store.counters,
                },
            )
        }))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::thread::sleep;
    use std::time::Duration;

    fn store_with(ttl: Duration, max_entries: usize) -> CacheStore {
        CacheStore::new(|_| PartitionPolicy::new(ttl, max_entries))
    }

    fn page(id: &str) -> Value {
        json!({"object": "page", "id": id})
    }

    #[test]
    fn test_store_new() {
        let store = store_with(Duration::from_secs(300), 100);
        assert!(store.is_empty());
        assert_eq!(store.stats().total_requests, 0);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = store_with(Duration::from_secs(300), 100);

        store.put(Partition::Pages, "p1".to_string(), page("p1"));

        assert_eq!(store.get(Partition::Pages, "p1"), Some(page("p1")));
        assert_eq!(store.len(Partition::Pages), 1);
    }

    #[test]
    fn test_partitions_do_not_share_keys() {
        let mut store = store_with(Duration::from_secs(300), 100);

        store.put(Partition::Pages, "same-id".to_string(), page("as-page"));

        assert_eq!(store.get(Partition::Blocks, "same-id"), None);
        assert_eq!(store.get(Partition::Pages, "same-id"), Some(page("as-page")));
    }

    #[test]
    fn test_store_get_nonexistent_records_miss() {
        let mut store = store_with(Duration::from_secs(300), 100);

        assert_eq!(store.get(Partition::Blocks, "missing"), None);

        let stats = store.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.partitions[&Partition::Blocks].counters.misses, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store_with(Duration::from_secs(300), 100);

        store.put(Partition::Pages, "p1".to_string(), json!(1));
        store.put(Partition::Pages, "p1".to_string(), json!(2));

        assert_eq!(store.get(Partition::Pages, "p1"), Some(json!(2)));
        assert_eq!(store.len(Partition::Pages), 1);
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store_with(Duration::from_millis(50), 100);

        store.put(Partition::Pages, "p1".to_string(), page("p1"));
        assert!(store.get(Partition::Pages, "p1").is_some());

        sleep(Duration::from_millis(70));

        assert_eq!(store.get(Partition::Pages, "p1"), None);
        assert_eq!(store.len(Partition::Pages), 0);
        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store_with(Duration::from_secs(300), 3);

        store.put(Partition::Pages, "a".to_string(), json!("a"));
        store.put(Partition::Pages, "b".to_string(), json!("b"));
        store.put(Partition::Pages, "c".to_string(), json!("c"));
        store.put(Partition::Pages, "d".to_string(), json!("d"));

        assert_eq!(store.len(Partition::Pages), 3);
        assert_eq!(store.get(Partition::Pages, "a"), None);
        assert!(store.get(Partition::Pages, "b").is_some());
        assert!(store.get(Partition::Pages, "d").is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store_with(Duration::from_secs(300), 3);

        store.put(Partition::Pages, "a".to_string(), json!("a"));
        store.put(Partition::Pages, "b".to_string(), json!("b"));
        store.put(Partition::Pages, "c".to_string(), json!("c"));

        store.get(Partition::Pages, "a");
        store.put(Partition::Pages, "d".to_string(), json!("d"));

        assert!(store.get(Partition::Pages, "a").is_some());
        assert_eq!(store.get(Partition::Pages, "b"), None);
    }

    #[test]
    fn test_capacity_is_per_partition() {
        let mut store = store_with(Duration::from_secs(300), 1);

        store.put(Partition::Pages, "x".to_string(), json!(1));
        store.put(Partition::Blocks, "y".to_string(), json!(2));

        assert!(store.get(Partition::Pages, "x").is_some());
        assert!(store.get(Partition::Blocks, "y").is_some());
    }

    #[test]
    fn test_full_partition_prefers_expired_over_lru() {
        let mut store = CacheStore::new(|p| match p {
            Partition::Pages => PartitionPolicy::new(Duration::from_millis(40), 2),
            _ => PartitionPolicy::new(Duration::from_secs(300), 2),
        });

        store.put(Partition::Pages, "old".to_string(), json!(1));
        sleep(Duration::from_millis(60));
        store.put(Partition::Pages, "fresh".to_string(), json!(2));
        store.put(Partition::Pages, "new".to_string(), json!(3));

        assert!(store.get(Partition::Pages, "fresh").is_some());
        assert!(store.get(Partition::Pages, "new").is_some());
    }

    #[test]
    fn test_invalidate() {
        let mut store = store_with(Duration::from_secs(300), 100);
        store.put(Partition::Pages, "p1".to_string(), page("p1"));

        assert!(store.invalidate(Partition::Pages, "p1"));
        assert!(!store.invalidate(Partition::Pages, "p1"));
        assert_eq!(store.get(Partition::Pages, "p1"), None);
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_invalidate_prefix() {
        let mut store = store_with(Duration::from_secs(300), 100);
        store.put(Partition::Blocks, "b1".to_string(), json!("block"));
        store.put(Partition::Blocks, "b1:{\"page_size\":10}".to_string(), json!([]));
        store.put(Partition::Blocks, "b1:{\"page_size\":20}".to_string(), json!([]));
        store.put(Partition::Blocks, "b10:{\"page_size\":10}".to_string(), json!([]));

        assert_eq!(store.invalidate_prefix(Partition::Blocks, "b1:"), 2);

        assert!(store.get(Partition::Blocks, "b1").is_some());
        assert!(store.get(Partition::Blocks, "b10:{\"page_size\":10}").is_some());
        assert_eq!(store.stats().invalidations, 2);
    }

    #[test]
    fn test_apply_counts_removed_entries() {
        let mut store = store_with(Duration::from_secs(300), 100);
        store.put(Partition::Blocks, "b1".to_string(), json!(1));
        store.put(Partition::Blocks, "p1:{}".to_string(), json!(2));

        let removed = store.apply(&[
            Eviction::Key {
                partition: Partition::Blocks,
                key: "b1".to_string(),
            },
            Eviction::Prefix {
                partition: Partition::Blocks,
                prefix: "p1:".to_string(),
            },
            Eviction::Key {
                partition: Partition::Pages,
                key: "absent".to_string(),
            },
        ]);

        assert_eq!(removed, 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_single_partition() {
        let mut store = store_with(Duration::from_secs(300), 100);
        store.put(Partition::Pages, "p1".to_string(), json!(1));
        store.put(Partition::Blocks, "b1".to_string(), json!(2));
        store.get(Partition::Pages, "p1");

        store.clear(Some(Partition::Pages));

        let stats = store.stats();
        assert_eq!(stats.cache_sizes[&Partition::Pages], 0);
        assert_eq!(stats.cache_sizes[&Partition::Blocks], 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_clear_all_resets_counters() {
        let mut store = store_with(Duration::from_secs(300), 100);
        store.put(Partition::Pages, "p1".to_string(), json!(1));
        store.get(Partition::Pages, "p1");
        store.get(Partition::Pages, "p2");

        store.clear(None);

        let stats = store.stats();
        assert!(store.is_empty());
        assert_eq!(stats.total_requests, 0);
        assert_eq!(stats.hit_rate_percent, 0.0);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = store_with(Duration::from_millis(40), 100);
        store.put(Partition::Pages, "p1".to_string(), json!(1));
        store.put(Partition::DataSources, "ds1".to_string(), json!(2));

        sleep(Duration::from_millis(60));
        store.put(Partition::Blocks, "b1".to_string(), json!(3));

        assert_eq!(store.purge_expired(), 2);
        assert_eq!(store.len(Partition::Blocks), 1);
        assert_eq!(store.stats().misses, 0, "purge must not count as lookups");
    }

    #[test]
    fn test_store_stats() {
        let mut store = store_with(Duration::from_secs(300), 100);

        store.put(Partition::Pages, "p1".to_string(), json!(1));
        store.get(Partition::Pages, "p1");
        store.get(Partition::Pages, "missing");

        let stats = store.stats();
        assert!(stats.enabled);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate_percent, 50.0);
        assert_eq!(stats.cache_sizes[&Partition::Pages], 1);
        assert_eq!(stats.cache_sizes.len(), 4);
    }
}
