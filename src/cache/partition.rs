//! Cache Partitions
//!
//! One independent namespace per resource category.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// == Partition ==
/// Resource category owning a separate key space, TTL and capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Partition {
    Pages,
    Blocks,
    Databases,
    DataSources,
}

impl Partition {
    pub const ALL: [Partition; 4] = [
        Partition::Pages,
        Partition::Blocks,
        Partition::Databases,
        Partition::DataSources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Pages => "pages",
            Partition::Blocks => "blocks",
            Partition::Databases => "databases",
            Partition::DataSources => "data_sources",
        }
    }

    /// Slot of this partition in per-partition arrays.
    pub(crate) fn index(&self) -> usize {
        match self {
            Partition::Pages => 0,
            Partition::Blocks => 1,
            Partition::Databases => 2,
            Partition::DataSources => 3,
        }
    }

    /// Parses a clear target: `all` selects every partition.
    pub fn parse_target(name: &str) -> Result<Option<Partition>, UnknownPartition> {
        if name == "all" {
            Ok(None)
        } else {
            name.parse().map(Some)
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("Unknown cache partition: {0}")]
pub struct UnknownPartition(pub String);

impl FromStr for Partition {
    type Err = UnknownPartition;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Partition::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPartition(s.to_string()))
    }
}

// == Partition Policy ==
/// TTL and capacity of one partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartitionPolicy {
    pub ttl: Duration,
    pub max_entries: usize,
}

impl PartitionPolicy {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self { ttl, max_entries }
    }
}
