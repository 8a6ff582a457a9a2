//! Expired Entry Purge Task
//!
//! Background task that periodically drops expired cache entries so memory
//! does not wait on lookups to reclaim them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::client::NotionClient;

/// Spawns a task purging expired entries from `client`'s cache every
/// `interval_secs` seconds.
///
/// Returns the JoinHandle so shutdown can abort the task.
pub fn spawn_cleanup_task(client: NotionClient, interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs, "Starting cache purge task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = client.purge_expired().await;
            if removed > 0 {
                info!(removed, "Cache purge: removed expired entries");
            } else {
                debug!("Cache purge: no expired entries found");
            }
        }
    })
}
