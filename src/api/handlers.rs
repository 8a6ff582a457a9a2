//! API Handlers
//!
//! HTTP handlers for the cache gateway. Resource routes forward to the
//! cached client and pass Notion's JSON through unchanged; the `/cache`
//! routes expose statistics and clearing.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStats, Partition};
use crate::client::NotionClient;
use crate::error::{NotionError, Result};
use crate::models::{
    AppendChildrenRequest, BlockChildrenParams, ClearCacheResponse, CreatePageRequest,
    HealthResponse, QueryDataSourceParams, UpdateDataSourceRequest, UpdatePageRequest,
};

/// Application state shared across all handlers.
///
/// The client is internally reference counted; cloning the state shares
/// one cache store.
#[derive(Clone, Debug)]
pub struct AppState {
    pub client: NotionClient,
}

impl AppState {
    pub fn new(client: NotionClient) -> Self {
        Self { client }
    }
}

// == Pages ==
/// GET /pages/:id
pub async fn get_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> Result<Json<Value>> {
    state.client.get_page(&page_id).await.map(Json)
}

/// PATCH /pages/:id
pub async fn update_page_handler(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    Json(req): Json<UpdatePageRequest>,
) -> Result<Json<Value>> {
    state
        .client
        .update_page(&page_id, req.properties)
        .await
        .map(Json)
}

/// POST /pages
pub async fn create_page_handler(
    State(state): State<AppState>,
    Json(req): Json<CreatePageRequest>,
) -> Result<Json<Value>> {
    state.client.create_page(&req).await.map(Json)
}

// == Databases / Data Sources ==
/// GET /databases/:id
pub async fn get_database_handler(
    State(state): State<AppState>,
    Path(database_id): Path<String>,
) -> Result<Json<Value>> {
    state.client.get_database(&database_id).await.map(Json)
}

/// GET /data_sources/:id
pub async fn get_data_source_handler(
    State(state): State<AppState>,
    Path(data_source_id): Path<String>,
) -> Result<Json<Value>> {
    state.client.get_data_source(&data_source_id).await.map(Json)
}

/// POST /data_sources/:id/query
pub async fn query_data_source_handler(
    State(state): State<AppState>,
    Path(data_source_id): Path<String>,
    Json(params): Json<QueryDataSourceParams>,
) -> Result<Json<Value>> {
    state
        .client
        .query_data_source(&data_source_id, &params)
        .await
        .map(Json)
}

/// PATCH /data_sources/:id
pub async fn update_data_source_handler(
    State(state): State<AppState>,
    Path(data_source_id): Path<String>,
    Json(req): Json<UpdateDataSourceRequest>,
) -> Result<Json<Value>> {
    state
        .client
        .update_data_source(&data_source_id, &req)
        .await
        .map(Json)
}

// == Blocks ==
/// GET /blocks/:id
pub async fn get_block_handler(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
) -> Result<Json<Value>> {
    state.client.get_block(&block_id).await.map(Json)
}

/// GET /blocks/:id/children?page_size=&start_cursor=
pub async fn get_block_children_handler(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
    Query(params): Query<BlockChildrenParams>,
) -> Result<Json<Value>> {
    state
        .client
        .get_block_children(&block_id, &params)
        .await
        .map(Json)
}

/// PATCH /blocks/:id/children
pub async fn append_block_children_handler(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
    Json(req): Json<AppendChildrenRequest>,
) -> Result<Json<Value>> {
    state
        .client
        .append_block_children(&block_id, req.children)
        .await
        .map(Json)
}

/// PATCH /blocks/:id
pub async fn update_block_handler(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
    Json(content): Json<Value>,
) -> Result<Json<Value>> {
    state.client.update_block(&block_id, content).await.map(Json)
}

/// DELETE /blocks/:id
pub async fn delete_block_handler(
    State(state): State<AppState>,
    Path(block_id): Path<String>,
) -> Result<Json<Value>> {
    state.client.delete_block(&block_id).await.map(Json)
}

// == Cache ==
/// GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.client.get_cache_stats().await)
}

/// DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<ClearCacheResponse> {
    state.client.clear_cache(None).await;
    Json(ClearCacheResponse::new(None))
}

/// DELETE /cache/:partition
///
/// `all` clears every partition; unknown names are a 400.
pub async fn clear_partition_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ClearCacheResponse>> {
    let partition =
        Partition::parse_target(&name).map_err(|e| NotionError::invalid(e.to_string()))?;
    state.client.clear_cache(partition).await;
    Ok(Json(ClearCacheResponse::new(partition)))
}

/// GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.client.is_caching_enabled()))
}
