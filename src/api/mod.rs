//! API Module
//!
//! HTTP handlers and routing for the local cache gateway. The gateway
//! fronts one [`NotionClient`](crate::client::NotionClient), so every
//! caller of the gateway shares its response cache.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
