//! Invalidation Rules
//!
//! Static table from each mutating operation to the cache entries it makes
//! stale. Rules are resolved against the ids of one concrete write and
//! applied only after that write succeeded.

use self::Scope::{Children, Entry};
use self::Subject::{Listing, Parent, Resource};
use crate::cache::key::{children_prefix, resource_key, ALL_SENTINEL};
use crate::cache::Partition;
use crate::cache::Partition::{Blocks, DataSources, Databases, Pages};

// == Write Operation ==
/// Every mutating call the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOperation {
    UpdatePage,
    CreatePageInPage,
    CreatePageInDataSource,
    CreateWorkspacePage,
    UpdateDataSource,
    /// Data source update that also moves it under another database
    MoveDataSource,
    AppendBlockChildren,
    UpdateBlock,
    DeleteBlock,
    CreateDatabase,
    UpdateDatabase,
}

/// Whose id a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// The resource the write addressed
    Resource,
    /// Its parent (new parent for moves)
    Parent,
    /// The partition's unfiltered listing
    Listing,
}

/// Which keys of the subject a rule removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// The subject's own entry
    Entry,
    /// Every parametrized entry of the subject (child lists, queries)
    Children,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionRule {
    pub partition: Partition,
    pub scope: Scope,
    pub subject: Subject,
}

const fn rule(partition: Partition, scope: Scope, subject: Subject) -> EvictionRule {
    EvictionRule {
        partition,
        scope,
        subject,
    }
}

// Renames and trashing change what the workspace listing shows.
const UPDATE_PAGE: &[EvictionRule] = &[rule(Pages, Entry, Resource), rule(Pages, Entry, Listing)];
const CREATE_PAGE_IN_PAGE: &[EvictionRule] = &[
    rule(Pages, Entry, Parent),
    rule(Blocks, Children, Parent),
    rule(Pages, Entry, Listing),
];
const CREATE_PAGE_IN_DATA_SOURCE: &[EvictionRule] = &[
    rule(DataSources, Entry, Parent),
    rule(DataSources, Children, Parent),
    rule(Pages, Entry, Listing),
];
const CREATE_WORKSPACE_PAGE: &[EvictionRule] = &[rule(Pages, Entry, Listing)];
// Schema changes leave cached query results to their TTL.
const UPDATE_DATA_SOURCE: &[EvictionRule] = &[rule(DataSources, Entry, Resource)];
const MOVE_DATA_SOURCE: &[EvictionRule] = &[
    rule(DataSources, Entry, Resource),
    rule(Databases, Entry, Parent),
];
const APPEND_BLOCK_CHILDREN: &[EvictionRule] = &[rule(Blocks, Children, Resource)];
const UPDATE_BLOCK: &[EvictionRule] = &[rule(Blocks, Entry, Resource)];
const DELETE_BLOCK: &[EvictionRule] = &[rule(Blocks, Entry, Resource), rule(Blocks, Children, Parent)];
const CREATE_DATABASE: &[EvictionRule] = &[
    rule(Pages, Entry, Parent),
    rule(Blocks, Children, Parent),
    rule(Databases, Entry, Listing),
];
const UPDATE_DATABASE: &[EvictionRule] = &[
    rule(Databases, Entry, Resource),
    rule(Databases, Entry, Listing),
];

// == Rule Lookup ==
/// Rules for an operation. Pure; never fails.
pub fn rules_for(operation: WriteOperation) -> &'static [EvictionRule] {
    match operation {
        WriteOperation::UpdatePage => UPDATE_PAGE,
        WriteOperation::CreatePageInPage => CREATE_PAGE_IN_PAGE,
        WriteOperation::CreatePageInDataSource => CREATE_PAGE_IN_DATA_SOURCE,
        WriteOperation::CreateWorkspacePage => CREATE_WORKSPACE_PAGE,
        WriteOperation::UpdateDataSource => UPDATE_DATA_SOURCE,
        WriteOperation::MoveDataSource => MOVE_DATA_SOURCE,
        WriteOperation::AppendBlockChildren => APPEND_BLOCK_CHILDREN,
        WriteOperation::UpdateBlock => UPDATE_BLOCK,
        WriteOperation::DeleteBlock => DELETE_BLOCK,
        WriteOperation::CreateDatabase => CREATE_DATABASE,
        WriteOperation::UpdateDatabase => UPDATE_DATABASE,
    }
}

// == Eviction ==
/// A concrete removal against the cache store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eviction {
    Key { partition: Partition, key: String },
    Prefix { partition: Partition, prefix: String },
}

/// Ids of one write, used to resolve its rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct WriteTarget<'a> {
    pub resource_id: Option<&'a str>,
    pub parent_id: Option<&'a str>,
}

impl<'a> WriteTarget<'a> {
    pub fn resource(id: &'a str) -> Self {
        Self {
            resource_id: Some(id),
            parent_id: None,
        }
    }

    pub fn parent(id: &'a str) -> Self {
        Self {
            resource_id: None,
            parent_id: Some(id),
        }
    }

    pub fn with_parent(mut self, parent_id: Option<&'a str>) -> Self {
        self.parent_id = parent_id;
        self
    }
}

/// Expands an operation's rules into evictions.
///
/// Rules whose subject id is unknown for this write are skipped.
pub fn resolve(operation: WriteOperation, target: WriteTarget<'_>) -> Vec<Eviction> {
    rules_for(operation)
        .iter()
        .filter_map(|rule| {
            let id = match rule.subject {
                Subject::Resource => target.resource_id?,
                Subject::Parent => target.parent_id?,
                Subject::Listing => ALL_SENTINEL,
            };
            Some(match rule.scope {
                Scope::Entry => Eviction::Key {
                    partition: rule.partition,
                    key: resource_key(id),
                },
                Scope::Children => Eviction::Prefix {
                    partition: rule.partition,
                    prefix: children_prefix(id),
                },
            })
        })
        .collect()
}
