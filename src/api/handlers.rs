//! API Handlers
//!
//! The catch-all proxy handler that feeds intercepted requests into the
//! agent, plus the reserved control and diagnostics endpoints.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::oneshot;

use crate::agent::CacheAgent;
use crate::control::{ControlMessage, GET_VERSION};
use crate::error::{AgentError, Result};
use crate::fetch::{Fetch, FetchRequest, FetchResponse, RequestDestination, RequestMode};
use crate::models::{ControlEnvelope, HealthResponse, MessageResponse, StatsResponse, VersionResponse};

/// Headers that describe the hop, not the payload; never forwarded.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "content-length",
];

// == App State ==
/// Application state shared across all handlers.
pub struct AppState<F> {
    /// The intercepting agent
    pub agent: Arc<CacheAgent<F>>,
}

impl<F> AppState<F> {
    /// Creates a new AppState around an agent.
    pub fn new(agent: Arc<CacheAgent<F>>) -> Self {
        Self { agent }
    }
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            agent: self.agent.clone(),
        }
    }
}

// == Proxy Handler ==
/// Catch-all interception point: every request not claimed by a reserved
/// route flows through the agent.
pub async fn proxy_handler<F: Fetch>(
    State(state): State<AppState<F>>,
    request: Request,
) -> Response {
    let fetch_request = match into_fetch_request(&state.agent, &request) {
        Ok(fetch_request) => fetch_request,
        Err(err) => return err.into_response(),
    };

    let response = state.agent.handle(fetch_request).await;
    into_axum_response(response)
}

/// Rebuilds the intercepted request on the canonical upstream origin and
/// derives mode/destination from the `Sec-Fetch-*` headers, falling back
/// to an Accept-header heuristic for navigation.
fn into_fetch_request<F: Fetch>(
    agent: &CacheAgent<F>,
    request: &Request,
) -> Result<FetchRequest> {
    let path_and_query = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let url = agent.origin().join(path_and_query)?;

    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
    };

    let mode = match header("sec-fetch-mode") {
        Some(value) => RequestMode::from_header(value),
        None => {
            let accepts_html = header("accept").is_some_and(|accept| accept.contains("text/html"));
            if request.method().as_str() == "GET" && accepts_html {
                RequestMode::Navigate
            } else {
                RequestMode::Cors
            }
        }
    };
    let destination = match header("sec-fetch-dest") {
        Some(value) => RequestDestination::from_header(value),
        None if mode == RequestMode::Navigate => RequestDestination::Document,
        None => RequestDestination::Empty,
    };

    Ok(FetchRequest::new(request.method().as_str(), url)
        .with_mode(mode)
        .with_destination(destination))
}

/// Converts a response snapshot back into an axum response.
fn into_axum_response(response: FetchResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut builder = Response::builder().status(status);
    for (name, value) in &response.headers {
        if !HOP_BY_HOP_HEADERS
            .iter()
            .any(|hop| hop.eq_ignore_ascii_case(name))
        {
            builder = builder.header(name.as_str(), value.as_str());
        }
    }

    builder
        .body(Body::from(response.body))
        .unwrap_or_else(|_| StatusCode::BAD_GATEWAY.into_response())
}

// == Control Handler ==
/// Handler for POST /_agent/message
///
/// Decodes the control envelope and routes it to the agent. `GET_VERSION`
/// waits for the reply on a fresh oneshot channel.
pub async fn message_handler<F: Fetch>(
    State(state): State<AppState<F>>,
    Json(envelope): Json<ControlEnvelope>,
) -> Result<Response> {
    match envelope.kind.as_str() {
        GET_VERSION => {
            let (reply, receiver) = oneshot::channel();
            let message = ControlMessage::decode(&envelope.kind, Some(reply))?;
            state.agent.handle_message(message).await;
            let version = receiver
                .await
                .map_err(|_| AgentError::Internal("version reply dropped".to_string()))?;
            Ok(Json(VersionResponse::new(version)).into_response())
        }
        _ => {
            // Unknown types fail decoding with a 400.
            let message = ControlMessage::decode(&envelope.kind, None)?;
            state.agent.handle_message(message).await;
            Ok(Json(MessageResponse::new("skip waiting requested")).into_response())
        }
    }
}

// == Stats Handler ==
/// Handler for GET /_agent/stats
pub async fn stats_handler<F: Fetch>(State(state): State<AppState<F>>) -> Json<StatsResponse> {
    let stats = state.agent.stats().await;
    Json(StatsResponse::new(
        stats.hits,
        stats.misses,
        stats.evictions,
        stats.total_entries,
    ))
}

// == Health Handler ==
/// Handler for GET /_agent/health
pub async fn health_handler<F: Fetch>(State(state): State<AppState<F>>) -> Json<HealthResponse> {
    let state_name = state.agent.state().await.to_string();
    Json(HealthResponse::healthy(state.agent.version(), state_name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetch::testing::StubFetch;
    use axum::http::Request;

    fn state() -> AppState<StubFetch> {
        let agent = CacheAgent::new(&Config::default(), StubFetch::new()).unwrap();
        AppState::new(Arc::new(agent))
    }

    #[test]
    fn test_into_fetch_request_rebases_on_upstream() {
        let state = state();
        let request = Request::builder()
            .method("GET")
            .uri("/api/trips/42?full=1")
            .body(Body::empty())
            .unwrap();

        let fetch_request = into_fetch_request(&state.agent, &request).unwrap();
        assert_eq!(
            fetch_request.url.as_str(),
            "http://localhost:8080/api/trips/42?full=1"
        );
        assert_eq!(fetch_request.method, "GET");
    }

    #[test]
    fn test_sec_fetch_headers_parsed() {
        let state = state();
        let request = Request::builder()
            .method("GET")
            .uri("/media/hero.png")
            .header("sec-fetch-mode", "no-cors")
            .header("sec-fetch-dest", "image")
            .body(Body::empty())
            .unwrap();

        let fetch_request = into_fetch_request(&state.agent, &request).unwrap();
        assert_eq!(fetch_request.mode, RequestMode::NoCors);
        assert_eq!(fetch_request.destination, RequestDestination::Image);
    }

    #[test]
    fn test_accept_header_navigation_fallback() {
        let state = state();
        let request = Request::builder()
            .method("GET")
            .uri("/trips/42")
            .header("accept", "text/html,application/xhtml+xml")
            .body(Body::empty())
            .unwrap();

        let fetch_request = into_fetch_request(&state.agent, &request).unwrap();
        assert_eq!(fetch_request.mode, RequestMode::Navigate);
        assert_eq!(fetch_request.destination, RequestDestination::Document);
    }

    #[test]
    fn test_into_axum_response_strips_hop_by_hop() {
        let mut snapshot = FetchResponse::with_body(200, "text/plain", "ok");
        snapshot
            .headers
            .push(("transfer-encoding".to_string(), "chunked".to_string()));
        snapshot
            .headers
            .push(("x-kept".to_string(), "yes".to_string()));

        let response = into_axum_response(snapshot);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get("transfer-encoding").is_none());
        assert_eq!(response.headers().get("x-kept").unwrap(), "yes");
    }
}
