//! API Routes
//!
//! Configures the Axum router: three reserved agent endpoints plus the
//! catch-all proxy fallback that intercepts everything else.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    health_handler, message_handler, proxy_handler, stats_handler, AppState,
};
use crate::fetch::Fetch;

/// Creates the main router.
///
/// # Endpoints
/// - `POST /_agent/message` - Control channel (SKIP_WAITING, GET_VERSION)
/// - `GET /_agent/stats` - Cache statistics
/// - `GET /_agent/health` - Health and lifecycle state
/// - everything else - intercepted and resolved by the agent
///
/// # Middleware
/// - Tracing: logs all requests for debugging
pub fn create_router<F: Fetch>(state: AppState<F>) -> Router {
    Router::new()
        .route("/_agent/message", post(message_handler::<F>))
        .route("/_agent/stats", get(stats_handler::<F>))
        .route("/_agent/health", get(health_handler::<F>))
        .fallback(proxy_handler::<F>)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::CacheAgent;
    use crate::config::Config;
    use crate::fetch::testing::StubFetch;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let agent = CacheAgent::new(&Config::default(), StubFetch::new()).unwrap();
        create_router(AppState::new(Arc::new(agent)))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_agent/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/_agent/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_message_endpoint_get_version() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/_agent/message")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"GET_VERSION"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_message_endpoint_rejects_unknown() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/_agent/message")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"type":"PING"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_fallback_proxies_requests() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/trips")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // The stub fetcher answers 200 for anything.
        assert_eq!(response.status(), StatusCode::OK);
    }
}
