//! API Routes
//!
//! Configures the Axum router: worker endpoints under `/_worker`, and a
//! fallback that proxies everything else through the worker.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    caches_handler, health_handler, proxy_handler, state_handler, stats_handler, version_handler,
    AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /_worker/health` - Health check endpoint
/// - `GET /_worker/state` - Lifecycle state and manifest
/// - `GET /_worker/caches` - Cache names and sizes
/// - `GET /_worker/stats` - Interceptor hit/miss counters
/// - `GET /_worker/version` - Upstream version badge
/// - anything else - proxied, cache first
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/_worker/health", get(health_handler))
        .route("/_worker/state", get(state_handler))
        .route("/_worker/caches", get(caches_handler))
        .route("/_worker/stats", get(stats_handler))
        .route("/_worker/version", get(version_handler))
        .fallback(proxy_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStorage;
    use crate::config::WorkerConfig;
    use crate::fetch::mock::MockFetcher;
    use crate::worker::{Registration, ServiceWorker};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    async fn create_test_app() -> Router {
        let fetcher = Arc::new(MockFetcher::serving(&WorkerConfig::default().manifest));
        let worker =
            ServiceWorker::new(WorkerConfig::default(), CacheStorage::new(), fetcher.clone());
        let state = AppState::new(
            Registration::new(worker, fetcher),
            reqwest::Client::new(),
            url::Url::parse("http://127.0.0.1:9").unwrap(),
        );
        state.registration.run_lifecycle().await.unwrap();
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_worker/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cached_page_is_proxied_from_cache() {
        let app = create_test_app().await;

        let response = app
            .oneshot(Request::builder().uri("/about").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-pwa-cache"], "cache");
    }

    #[tokio::test]
    async fn test_unreachable_miss_is_bad_gateway() {
        let app = create_test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/message")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
