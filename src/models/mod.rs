//! Request and response models
//!
//! Typed Notion request parameters, plus the bodies the cache gateway
//! returns on its own behalf.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{
    AppendChildrenRequest, BlockChildrenParams, CreateDatabaseRequest, CreatePageRequest,
    ListUsersParams, Parent, QueryDataSourceParams, SearchFilter, SearchRequest,
    UpdateDataSourceRequest, UpdateDatabaseRequest, UpdatePageRequest, MAX_PAGE_SIZE,
};
pub use responses::{ClearCacheResponse, ErrorResponse, HealthResponse};
