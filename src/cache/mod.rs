//! Cache Module
//!
//! In-memory response caching with per-partition TTL expiration, LRU
//! eviction and write-triggered invalidation.

mod entry;
pub mod invalidation;
pub mod key;
mod lru;
mod partition;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use invalidation::{Eviction, WriteOperation, WriteTarget};
pub use lru::LruTracker;
pub use partition::{Partition, PartitionPolicy, UnknownPartition};
pub use stats::{hit_rate_percent, CacheStats, PartitionCounters, PartitionStats};
pub use store::CacheStore;
