//! Cache-first strategy
//!
//! Serves images: primary namespace, then offline bundles by full request
//! match, then the network. Cross-origin fetches go out with CORS and no
//! credentials so opaque responses remain usable, and cacheable successes
//! (opaque included) are stored under the same eviction rule.

use tracing::{debug, warn};

use crate::error::Result;
use crate::fetch::{Fetch, FetchOptions, FetchRequest, FetchResponse, RequestDestination};
use crate::store::{CacheKey, CacheStorage};
use crate::strategy::{offline, StrategyContext};

// == Run ==
pub async fn run<F: Fetch>(
    request: &FetchRequest,
    ctx: &StrategyContext<F>,
) -> Result<FetchResponse> {
    let key = request.key();
    let images = ctx.names.images();

    {
        let mut storage = ctx.storage.write().await;
        if let Some(response) = storage.lookup(&images, &key) {
            return Ok(response);
        }
        if let Some(response) = bundle_request_match(&storage, &key) {
            storage.record_hit();
            return Ok(response);
        }
    }

    let options = FetchOptions {
        cors_no_credentials: request.is_cross_origin(&ctx.canonical_origin),
        ..FetchOptions::default()
    };

    match ctx.fetcher.fetch(request, options).await {
        Ok(response) => {
            if response.is_cacheable() {
                let mut storage = ctx.storage.write().await;
                if let Err(err) = storage.put(&images, key, response.clone()) {
                    warn!(namespace = %images, error = %err, "image cache write failed");
                }
            }
            Ok(response)
        }
        Err(err) if request.destination == RequestDestination::Image => {
            debug!(url = %request.url, error = %err, "image fetch failed, serving placeholder");
            Ok(offline::placeholder_image())
        }
        Err(err) => Err(err),
    }
}

/// Bundles are searched by full request match only; the deeper cascade
/// tiers are reserved for network-first misses.
fn bundle_request_match(storage: &CacheStorage, key: &CacheKey) -> Option<FetchResponse> {
    storage
        .discover_offline_bundles()
        .iter()
        .find_map(|bundle| bundle.match_request(key))
        .cloned()
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetch;
    use crate::strategy::testing::context;
    use url::Url;

    fn image_request(url: &str) -> FetchRequest {
        FetchRequest::get(Url::parse(url).unwrap()).with_destination(RequestDestination::Image)
    }

    #[tokio::test]
    async fn test_cached_image_served_without_network() {
        let ctx = context(StubFetch::new());
        let request = image_request("http://localhost:8080/media/hero.png");
        {
            let mut storage = ctx.storage.write().await;
            storage
                .put(
                    "images-v1",
                    request.key(),
                    FetchResponse::with_body(200, "image/png", "cached-bytes"),
                )
                .unwrap();
        }

        let response = run(&request, &ctx).await.unwrap();
        assert_eq!(response.text(), "cached-bytes");
        assert_eq!(ctx.fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_bundle_hit_by_request_match() {
        let ctx = context(StubFetch::new());
        let request = image_request("http://localhost:8080/media/trip.jpg");
        {
            let mut storage = ctx.storage.write().await;
            storage
                .register_bundle(42)
                .put(
                    request.key(),
                    FetchResponse::with_body(200, "image/jpeg", "bundled"),
                )
                .unwrap();
        }

        let response = run(&request, &ctx).await.unwrap();
        assert_eq!(response.text(), "bundled");
        assert_eq!(ctx.fetcher.call_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_fetches_and_stores() {
        let stub = StubFetch::new();
        stub.respond(
            "GET",
            "http://localhost:8080/media/hero.png",
            FetchResponse::with_body(200, "image/png", "fresh"),
        );
        let ctx = context(stub);
        let request = image_request("http://localhost:8080/media/hero.png");

        let response = run(&request, &ctx).await.unwrap();
        assert_eq!(response.text(), "fresh");

        let storage = ctx.storage.read().await;
        assert!(storage
            .get("images-v1")
            .unwrap()
            .match_request(&request.key())
            .is_some());
    }

    #[tokio::test]
    async fn test_cross_origin_uses_cors_no_credentials() {
        let ctx = context(StubFetch::new());
        let request = image_request("https://images.example.com/photos/1.jpg");

        run(&request, &ctx).await.unwrap();

        let calls = ctx.fetcher.calls.lock().unwrap();
        assert!(calls[0].1.cors_no_credentials);
    }

    #[tokio::test]
    async fn test_same_origin_keeps_default_options() {
        let ctx = context(StubFetch::new());
        let request = image_request("http://localhost:8080/media/hero.png");

        run(&request, &ctx).await.unwrap();

        let calls = ctx.fetcher.calls.lock().unwrap();
        assert!(!calls[0].1.cors_no_credentials);
    }

    #[tokio::test]
    async fn test_opaque_response_stored() {
        let stub = StubFetch::new();
        stub.respond(
            "GET",
            "https://images.example.com/photos/1.jpg",
            FetchResponse::with_body(0, "application/octet-stream", "opaque-bytes").into_opaque(),
        );
        let ctx = context(stub);
        let request = image_request("https://images.example.com/photos/1.jpg");

        run(&request, &ctx).await.unwrap();

        let storage = ctx.storage.read().await;
        let stored = storage
            .get("images-v1")
            .unwrap()
            .match_request(&request.key())
            .unwrap();
        assert!(stored.opaque);
    }

    #[tokio::test]
    async fn test_offline_image_gets_placeholder() {
        let stub = StubFetch::new();
        stub.set_offline(true);
        let ctx = context(stub);
        let request = image_request("https://images.example.com/photos/1.jpg");

        let response = run(&request, &ctx).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("image/svg+xml"));
    }

    #[tokio::test]
    async fn test_offline_non_image_destination_propagates() {
        let stub = StubFetch::new();
        stub.set_offline(true);
        let ctx = context(stub);
        // Image-classed by host, but not an image destination.
        let request = FetchRequest::get(
            Url::parse("https://images.example.com/manifest.json").unwrap(),
        );

        let result = run(&request, &ctx).await;
        assert!(result.is_err());
    }
}
