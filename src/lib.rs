//! notion_cache - A caching Notion API client
//!
//! Typed wrappers over the Notion REST API with per-resource TTL caching,
//! LRU eviction and invalidation on writes, plus a small HTTP gateway that
//! serves the cached client to local callers.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod models;
pub mod properties;
pub mod tasks;
pub mod transport;

pub use api::{create_router, AppState};
pub use cache::{CacheStats, Partition};
pub use client::NotionClient;
pub use config::{ClientConfig, GatewayConfig};
pub use error::{NotionError, Result};
pub use helpers::{format_database_title, format_page_title};
pub use tasks::spawn_cleanup_task;
pub use transport::{ApiRequest, HttpTransport, Method, Transport};
