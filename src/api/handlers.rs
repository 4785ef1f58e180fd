//! API Handlers
//!
//! HTTP handlers for the cache administration endpoints and health check.

use std::sync::Arc;

use axum::{body::Bytes, extract::State, Json};
use tracing::info;

use super::catalog::Catalog;
use crate::cache::{read_store, write_store, CacheStore, SharedStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::middleware::{CacheOptions, ResponseCache};
use crate::models::{ClearPatternRequest, ClearResponse, HealthResponse, StatsResponse};

/// Application state shared across all handlers.
///
/// The response cache (store plus options) drives both the middleware on the
/// cached routes and the admin endpoints, so they always see the same store.
#[derive(Clone, Debug)]
pub struct AppState {
    pub cache: ResponseCache,
    pub catalog: Arc<Catalog>,
}

impl AppState {
    pub fn new(store: CacheStore, options: CacheOptions) -> Self {
        Self {
            cache: ResponseCache::new(store.into_shared(), options),
            catalog: Arc::new(Catalog::demo()),
        }
    }

    /// Builds the store and middleware options from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        let store = CacheStore::new(config.max_entries, config.max_size_bytes);
        Self::new(store, config.cache_options())
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }

    pub fn store(&self) -> &SharedStore {
        self.cache.store()
    }
}

/// Handler for GET /admin/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = read_store(state.store(), "admin.stats").stats();
    Json(StatsResponse::from(stats))
}

/// Handler for POST /admin/cache/clear
///
/// Removes every entry. Clearing an empty cache succeeds with a count of 0.
pub async fn clear_handler(State(state): State<AppState>) -> Result<Json<ClearResponse>> {
    let cleared = write_store(state.store(), "admin.clear").clear_pattern(None)?;
    info!(cleared, "cleared all cache entries");
    Ok(Json(ClearResponse::all(cleared)))
}

/// Handler for POST /admin/cache/clear-pattern
///
/// Body: `{"pattern": "<regex>"}`. A missing, empty or invalid pattern is a
/// 400 and leaves the store untouched.
pub async fn clear_pattern_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ClearResponse>> {
    let req: ClearPatternRequest = if body.is_empty() {
        ClearPatternRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| CacheError::InvalidRequest(e.to_string()))?
    };

    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let pattern = req.pattern.as_deref();
    let cleared = write_store(state.store(), "admin.clear_pattern").clear_pattern(pattern)?;
    info!(pattern = ?pattern, cleared, "cleared cache entries matching pattern");

    Ok(Json(ClearResponse::matching(cleared)))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
