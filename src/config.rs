//! Configuration Module
//!
//! Client and gateway configuration, loaded from environment variables with
//! defaults that match the public Notion API.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::cache::{Partition, PartitionPolicy};
use crate::error::{NotionError, Result};

pub const DEFAULT_NOTION_VERSION: &str = "2025-09-03";
pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";

/// Notion client configuration.
///
/// Fixed for the lifetime of one client instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Integration token
    pub api_key: String,
    /// Value of the `Notion-Version` header
    pub notion_version: String,
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before retry n is `retry_backoff_factor * 2^(n - 1)` seconds
    pub retry_backoff_factor: f64,
    /// Statuses that trigger a retry
    pub retry_status_forcelist: Vec<u16>,
    pub enable_caching: bool,
    /// TTLs in seconds, per partition
    pub cache_ttl_pages: u64,
    pub cache_ttl_blocks: u64,
    pub cache_ttl_databases: u64,
    pub cache_ttl_data_sources: u64,
    /// Maximum entries in each partition, unless overridden below
    pub cache_max_size: usize,
    /// Per-partition entry caps
    pub cache_max_size_pages: Option<usize>,
    pub cache_max_size_blocks: Option<usize>,
    pub cache_max_size_databases: Option<usize>,
    pub cache_max_size_data_sources: Option<usize>,
}

impl ClientConfig {
    /// Creates a config with defaults for everything except the token.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Self::default()
        }
    }

    /// Creates a new ClientConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `NOTION_API_KEY` - Integration token (required)
    /// - `NOTION_VERSION` - API version (default: 2025-09-03)
    /// - `NOTION_BASE_URL` - API base URL (default: https://api.notion.com/v1)
    /// - `NOTION_TIMEOUT` - Request timeout in seconds (default: 30)
    /// - `NOTION_MAX_RETRIES` - Retry attempts (default: 3)
    /// - `NOTION_ENABLE_CACHING` - `1/0`, `true/false`, `yes/no` or `on/off`,
    ///   any case (default: true)
    /// - `CACHE_TTL_PAGES` / `CACHE_TTL_BLOCKS` / `CACHE_TTL_DATABASES` /
    ///   `CACHE_TTL_DATA_SOURCES` - TTLs in seconds (300 / 600 / 1800 / 1800)
    /// - `CACHE_MAX_SIZE` - Entries per partition (default: 100)
    /// - `CACHE_MAX_SIZE_PAGES` / `CACHE_MAX_SIZE_BLOCKS` /
    ///   `CACHE_MAX_SIZE_DATABASES` / `CACHE_MAX_SIZE_DATA_SOURCES` -
    ///   Per-partition caps (default: `CACHE_MAX_SIZE`)
    ///
    /// A variable that is set but does not parse is a `Config` error.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let api_key = env::var("NOTION_API_KEY")
            .map_err(|_| NotionError::Config("NOTION_API_KEY is not set".to_string()))?;

        let config = Self {
            api_key,
            notion_version: env::var("NOTION_VERSION").unwrap_or(defaults.notion_version),
            base_url: env::var("NOTION_BASE_URL").unwrap_or(defaults.base_url),
            timeout: env_or("NOTION_TIMEOUT", defaults.timeout)?,
            max_retries: env_or("NOTION_MAX_RETRIES", defaults.max_retries)?,
            retry_backoff_factor: defaults.retry_backoff_factor,
            retry_status_forcelist: defaults.retry_status_forcelist,
            enable_caching: env_flag("NOTION_ENABLE_CACHING", defaults.enable_caching)?,
            cache_ttl_pages: env_or("CACHE_TTL_PAGES", defaults.cache_ttl_pages)?,
            cache_ttl_blocks: env_or("CACHE_TTL_BLOCKS", defaults.cache_ttl_blocks)?,
            cache_ttl_databases: env_or("CACHE_TTL_DATABASES", defaults.cache_ttl_databases)?,
            cache_ttl_data_sources: env_or(
                "CACHE_TTL_DATA_SOURCES",
                defaults.cache_ttl_data_sources,
            )?,
            cache_max_size: env_or("CACHE_MAX_SIZE", defaults.cache_max_size)?,
            cache_max_size_pages: env_opt("CACHE_MAX_SIZE_PAGES")?,
            cache_max_size_blocks: env_opt("CACHE_MAX_SIZE_BLOCKS")?,
            cache_max_size_databases: env_opt("CACHE_MAX_SIZE_DATABASES")?,
            cache_max_size_data_sources: env_opt("CACHE_MAX_SIZE_DATA_SOURCES")?,
        };
        config.validate()?;
        Ok(config)
    }

    // == Validate ==
    /// Rejects configurations the client cannot run with.
    ///
    /// An unusual token prefix only logs a warning.
    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(NotionError::Config("api_key is required".to_string()));
        }
        if !self.api_key.starts_with("secret_") && !self.api_key.starts_with("ntn_") {
            warn!(
                "API key format looks unusual. Expected to start with 'secret_' or 'ntn_'. \
                 Please verify you're using a valid Notion integration token."
            );
        }
        if self.timeout == 0 {
            return Err(NotionError::Config("timeout must be positive".to_string()));
        }
        if self.cache_max_size == 0 {
            return Err(NotionError::Config(
                "cache_max_size must be positive".to_string(),
            ));
        }
        for partition in Partition::ALL {
            if self.max_entries(partition) == 0 {
                return Err(NotionError::Config(format!(
                    "cache max size for {partition} must be positive"
                )));
            }
        }
        Ok(())
    }

    /// Entry cap for one partition, falling back to `cache_max_size`.
    pub fn max_entries(&self, partition: Partition) -> usize {
        let cap = match partition {
            Partition::Pages => self.cache_max_size_pages,
            Partition::Blocks => self.cache_max_size_blocks,
            Partition::Databases => self.cache_max_size_databases,
            Partition::DataSources => self.cache_max_size_data_sources,
        };
        cap.unwrap_or(self.cache_max_size)
    }

    /// TTL and capacity for one cache partition.
    pub fn partition_policy(&self, partition: Partition) -> PartitionPolicy {
        let ttl_secs = match partition {
            Partition::Pages => self.cache_ttl_pages,
            Partition::Blocks => self.cache_ttl_blocks,
            Partition::Databases => self.cache_ttl_databases,
            Partition::DataSources => self.cache_ttl_data_sources,
        };
        PartitionPolicy::new(Duration::from_secs(ttl_secs), self.max_entries(partition))
    }

    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
            max_retries: 3,
            retry_backoff_factor: 0.3,
            retry_status_forcelist: vec![429, 500, 502, 503, 504],
            enable_caching: true,
            cache_ttl_pages: 300,
            cache_ttl_blocks: 600,
            cache_ttl_databases: 1800,
            cache_ttl_data_sources: 1800,
            cache_max_size: 100,
            cache_max_size_pages: None,
            cache_max_size_blocks: None,
            cache_max_size_databases: None,
            cache_max_size_data_sources: None,
        }
    }
}

/// Settings for the local cache gateway binary.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub client: ClientConfig,
    /// HTTP server port
    pub server_port: u16,
    /// Expired-entry purge interval in seconds
    pub cleanup_interval: u64,
}

impl GatewayConfig {
    /// Loads the client config plus `SERVER_PORT` (default: 3000) and
    /// `CLEANUP_INTERVAL` (default: 60).
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            client: ClientConfig::from_env()?,
            server_port: env_or("SERVER_PORT", 3000)?,
            cleanup_interval: env_or("CLEANUP_INTERVAL", 60)?,
        })
    }
}

/// Reads a boolean switch: `1/0`, `true/false`, `yes/no`, `on/off`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn invalid(name: &str, raw: &str) -> NotionError {
    NotionError::Config(format!("{name} has an invalid value: '{raw}'"))
}

fn env_opt<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| invalid(name, &raw)),
        Err(_) => Ok(None),
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> Result<T> {
    Ok(env_opt(name)?.unwrap_or(default))
}

fn env_flag(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(raw) => parse_flag(&raw).ok_or_else(|| invalid(name, &raw)),
        Err(_) => Ok(default),
    }
}
