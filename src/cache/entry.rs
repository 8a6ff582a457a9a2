//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

use serde_json::Value;

// == Cache Entry ==
/// A cached API response and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response payload
    pub value: Value,
    /// When the entry was written
    pub stored_at: Instant,
    /// Maximum age before the entry is treated as absent
    pub ttl: Duration,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current instant.
    pub fn new(value: Value, ttl: Duration) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
            ttl,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired as soon as its age is greater
    /// than or equal to its TTL, so a zero TTL is expired on creation.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiry check against an explicit instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.stored_at) >= self.ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, zero once expired.
    #[cfg(test)]
    pub fn ttl_remaining(&self) -> Duration {
        self.ttl.saturating_sub(self.stored_at.elapsed())
    }
}
