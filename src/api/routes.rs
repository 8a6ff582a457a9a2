//! API Routes
//!
//! Configures the Axum router for the cache gateway.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    append_block_children_handler, clear_cache_handler, clear_partition_handler,
    create_page_handler, delete_block_handler, get_block_children_handler, get_block_handler,
    get_data_source_handler, get_database_handler, get_page_handler, health_handler,
    query_data_source_handler, stats_handler, update_block_handler, update_data_source_handler,
    update_page_handler, AppState,
};

/// Creates the gateway router.
///
/// # Endpoints
/// - `GET|PATCH /pages/:id`, `POST /pages`
/// - `GET /databases/:id`
/// - `GET|PATCH /data_sources/:id`, `POST /data_sources/:id/query`
/// - `GET|PATCH|DELETE /blocks/:id`, `GET|PATCH /blocks/:id/children`
/// - `GET /cache/stats`, `DELETE /cache`, `DELETE /cache/:partition`
/// - `GET /health`
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/pages", post(create_page_handler))
        .route("/pages/:id", get(get_page_handler).patch(update_page_handler))
        .route("/databases/:id", get(get_database_handler))
        .route(
            "/data_sources/:id",
            get(get_data_source_handler).patch(update_data_source_handler),
        )
        .route("/data_sources/:id/query", post(query_data_source_handler))
        .route(
            "/blocks/:id",
            get(get_block_handler)
                .patch(update_block_handler)
                .delete(delete_block_handler),
        )
        .route(
            "/blocks/:id/children",
            get(get_block_children_handler).patch(append_block_children_handler),
        )
        .route("/cache/stats", get(stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/:partition", delete(clear_partition_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
