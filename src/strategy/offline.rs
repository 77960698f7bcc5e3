//! Synthesized offline responses
//!
//! The terminal tier of the fallback cascade. Offline callers always get a
//! deterministic, typed result: JSON for API misses, minimal HTML for
//! document misses, an inline placeholder SVG for image misses.

use serde_json::json;

use crate::fetch::{FetchRequest, FetchResponse, RequestDestination};

/// Inline placeholder shown for images that miss every tier.
const PLACEHOLDER_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 400 300">"##,
    r##"<rect width="400" height="300" fill="#e2e8f0"/>"##,
    r##"<text x="200" y="150" font-family="sans-serif" font-size="16" "##,
    r##"fill="#64748b" text-anchor="middle">Image unavailable offline</text>"##,
    r##"</svg>"##
);

/// Minimal document served when a navigation misses every tier.
const OFFLINE_HTML: &str = concat!(
    "<!doctype html><html><head><meta charset=\"utf-8\">",
    "<title>Offline</title></head><body>",
    "<h1>You are offline</h1>",
    "<p>This page has not been saved for offline use.</p>",
    "</body></html>"
);

// == Synthesizers ==
/// Structured JSON 503 for API misses.
pub fn offline_api() -> FetchResponse {
    let body = json!({
        "error": "offline",
        "message": "This content has not been saved for offline use",
    });
    FetchResponse::with_body(503, "application/json", body.to_string())
}

/// Minimal HTML 503 for document misses.
pub fn offline_document() -> FetchResponse {
    FetchResponse::with_body(503, "text/html; charset=utf-8", OFFLINE_HTML)
}

/// Inline SVG 200 for image misses; an image slot renders a placeholder
/// instead of surfacing an error.
pub fn placeholder_image() -> FetchResponse {
    FetchResponse::with_body(200, "image/svg+xml", PLACEHOLDER_SVG)
}

/// Generic 503 for passthrough failures.
pub fn network_error() -> FetchResponse {
    FetchResponse::with_body(503, "text/plain", "Network error")
}

/// Picks the synthesized response for a request that missed every tier.
pub fn synthesize(request: &FetchRequest) -> FetchResponse {
    if request.destination == RequestDestination::Image {
        placeholder_image()
    } else if request.is_navigation() {
        offline_document()
    } else {
        offline_api()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{FetchRequest, RequestMode};
    use url::Url;

    fn get(url: &str) -> FetchRequest {
        FetchRequest::get(Url::parse(url).unwrap())
    }

    #[test]
    fn test_offline_api_shape() {
        let response = offline_api();
        assert_eq!(response.status, 503);
        assert_eq!(response.header("content-type"), Some("application/json"));

        let body: serde_json::Value = serde_json::from_slice(&response.body).unwrap();
        assert_eq!(body["error"], "offline");
        assert!(body["message"].is_string());
    }

    #[test]
    fn test_offline_document_is_html_503() {
        let response = offline_document();
        assert_eq!(response.status, 503);
        assert!(response.text().contains("You are offline"));
    }

    #[test]
    fn test_placeholder_image_is_svg_200() {
        let response = placeholder_image();
        assert_eq!(response.status, 200);
        assert_eq!(response.header("content-type"), Some("image/svg+xml"));
        assert!(response.text().starts_with("<svg"));
    }

    #[test]
    fn test_synthesize_by_request_shape() {
        let api = get("http://localhost:8080/api/trips/42");
        let document = get("http://localhost:8080/trips").with_mode(RequestMode::Navigate);
        let image = get("http://localhost:8080/media/a.png")
            .with_destination(crate::fetch::RequestDestination::Image);

        assert_eq!(synthesize(&api).status, 503);
        assert!(synthesize(&document).text().contains("offline"));
        assert_eq!(synthesize(&image).status, 200);
    }
}
