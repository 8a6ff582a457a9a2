//! Notion Client
//!
//! Typed wrappers over the Notion REST API with transparent response
//! caching. Reads go through the cache; writes always reach Notion and,
//! once they succeed, evict the cache entries they made stale.
//!
//! The client is cheap to clone. Clones share one transport and one cache
//! store.

mod blocks;
mod data_sources;
mod databases;
mod pages;
mod search;
mod users;

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{CacheStats, CacheStore, Eviction, Partition};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::transport::{ApiRequest, HttpTransport, Transport};

// == Client ==
/// Caching Notion API client.
#[derive(Clone)]
pub struct NotionClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    /// None when caching is disabled
    cache: Option<Mutex<CacheStore>>,
}

impl NotionClient {
    // == Constructors ==
    /// Creates a client talking to the Notion API over HTTP.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a client on top of an arbitrary transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let cache = config
            .enable_caching
            .then(|| Mutex::new(CacheStore::from_config(&config)));

        info!(
            caching = config.enable_caching,
            max_size = config.cache_max_size,
            "Notion client initialized"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                config,
                transport,
                cache,
            }),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn is_caching_enabled(&self) -> bool {
        self.inner.cache.is_some()
    }

    // == Request Paths ==
    /// Uncached call.
    async fn perform(&self, request: ApiRequest) -> Result<Value> {
        self.inner.transport.perform(request).await
    }

    /// Serves `key` from the cache, or fetches it and stores the result.
    ///
    /// The lock is released while the transport call is in flight, so two
    /// concurrent misses on one key both fetch; the later store wins.
    async fn read_through(&self, partition: Partition, key: String, request: ApiRequest) -> Result<Value> {
        let Some(cache) = &self.inner.cache else {
            return self.perform(request).await;
        };

        let cached = cache.lock().await.get(partition, &key);
        if let Some(value) = cached {
            debug!(%partition, key = %key, "Cache HIT");
            return Ok(value);
        }
        debug!(%partition, key = %key, "Cache MISS");

        let value = self.perform(request).await?;
        cache.lock().await.put(partition, key.clone(), value.clone());
        debug!(%partition, key = %key, "Cache STORE");
        Ok(value)
    }

    /// Performs a mutating call, then applies the evictions derived from
    /// its response. A failed call leaves the cache untouched.
    async fn write_through<F>(&self, request: ApiRequest, evictions: F) -> Result<Value>
    where
        F: FnOnce(&Value) -> Vec<Eviction>,
    {
        let method = request.method;
        let path = request.path.clone();
        let value = self.perform(request).await?;

        if let Some(cache) = &self.inner.cache {
            let evictions = evictions(&value);
            let removed = cache.lock().await.apply(&evictions);
            if removed > 0 {
                info!(%method, path = %path, removed, "Cache invalidated");
            }
        }
        Ok(value)
    }

    // == Cache Management ==
    /// Snapshot of the cache counters and partition sizes.
    pub async fn get_cache_stats(&self) -> CacheStats {
        match &self.inner.cache {
            Some(cache) => cache.lock().await.stats(),
            None => CacheStats::disabled(),
        }
    }

    /// Empties one partition, or all of them, and resets their counters.
    pub async fn clear_cache(&self, partition: Option<Partition>) {
        if let Some(cache) = &self.inner.cache {
            cache.lock().await.clear(partition);
            match partition {
                Some(p) => info!(partition = %p, "Cache cleared"),
                None => info!("All caches cleared"),
            }
        }
    }

    /// Physically drops expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        match &self.inner.cache {
            Some(cache) => cache.lock().await.purge_expired(),
            None => 0,
        }
    }
}

impl fmt::Debug for NotionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotionClient")
            .field("base_url", &self.inner.config.base_url)
            .field("caching", &self.is_caching_enabled())
            .finish()
    }
}

/// The `results` array of a list response, empty when missing.
fn into_results(mut response: Value) -> Vec<Value> {
    match response.get_mut("results").map(Value::take) {
        Some(Value::Array(results)) => results,
        _ => Vec::new(),
    }
}
