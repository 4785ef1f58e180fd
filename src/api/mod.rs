//! API Module
//!
//! HTTP handlers and routing for the cache administration surface and the
//! demo catalog served through the response cache.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /admin/cache/stats` - Cache statistics
//! - `POST /admin/cache/clear` - Clear every entry
//! - `POST /admin/cache/clear-pattern` - Clear entries whose key matches a regex
//! - `GET /api/catalog`, `GET /api/catalog/:id` - Cached demo resources

pub mod catalog;
pub mod handlers;
pub mod routes;

pub use catalog::{Catalog, Product};
pub use handlers::*;
pub use routes::create_router;
