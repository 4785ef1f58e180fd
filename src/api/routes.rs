//! API Routes
//!
//! Configures the Axum router: admin and health endpoints, plus the demo
//! catalog behind the response cache middleware.

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::catalog::{get_product, list_products};
use super::handlers::{
    clear_handler, clear_pattern_handler, health_handler, stats_handler, AppState,
};
use crate::middleware::response_cache;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check
/// - `GET /admin/cache/stats` - Cache statistics
/// - `POST /admin/cache/clear` - Remove every cached response
/// - `POST /admin/cache/clear-pattern` - Remove responses whose key matches a regex
/// - `GET /api/catalog` - Product list (cached)
/// - `GET /api/catalog/:id` - Single product (cached)
///
/// Only the catalog routes are wrapped by the cache; admin and health
/// responses are always live.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cached = Router::new()
        .route("/api/catalog", get(list_products))
        .route("/api/catalog/:id", get(get_product))
        .route_layer(from_fn_with_state(state.cache.clone(), response_cache));

    let admin = Router::new()
        .route("/admin/cache/stats", get(stats_handler))
        .route("/admin/cache/clear", post(clear_handler))
        .route("/admin/cache/clear-pattern", post(clear_pattern_handler));

    Router::new()
        .route("/health", get(health_handler))
        .merge(admin)
        .merge(cached)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::middleware::CacheOptions;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let state = AppState::new(CacheStore::new(100, 1024 * 1024), CacheOptions::default());
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-cache").is_none());
    }

    #[tokio::test]
    async fn test_stats_endpoint_not_cached() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/cache/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("x-cache").is_none());
    }

    #[tokio::test]
    async fn test_catalog_is_cached() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/catalog")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-cache"], "MISS");
    }

    #[tokio::test]
    async fn test_clear_pattern_requires_body() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/admin/cache/clear-pattern")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_route_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
