//! Error types for the offline agent
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Agent Error Enum ==
/// Unified error type for the offline agent.
///
/// Network errors are recoverable: the strategy executors catch them and
/// resolve through the fallback cascade. A non-2xx upstream response is
/// never an error at this level; it is returned to the caller unmodified.
#[derive(Error, Debug)]
pub enum AgentError {
    /// Transport-level fetch failure (connection refused, DNS, reset)
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    /// The upstream fetch exceeded the configured deadline
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Cache write rejected (oversized body, storage error)
    #[error("cache write failed: {0}")]
    CacheWrite(String),

    /// Install-time seeding of the static namespace failed
    #[error("install failed: {0}")]
    InstallFailed(String),

    /// Lifecycle state machine rejected a transition
    #[error("invalid lifecycle transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    /// Control message with an unknown or malformed type
    #[error("invalid control message: {0}")]
    InvalidMessage(String),

    /// A URL could not be parsed or joined
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl AgentError {
    /// True for failures of the network itself, the class the fallback
    /// cascade recovers from.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            AgentError::NetworkUnreachable(_) | AgentError::Timeout(_)
        )
    }
}

impl From<url::ParseError> for AgentError {
    fn from(err: url::ParseError) -> Self {
        AgentError::InvalidUrl(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AgentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AgentError::NetworkUnreachable(_) | AgentError::Timeout(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Network error".to_string())
            }
            AgentError::InvalidMessage(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AgentError::CacheWrite(_)
            | AgentError::InstallFailed(_)
            | AgentError::InvalidTransition { .. }
            | AgentError::InvalidUrl(_)
            | AgentError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the offline agent.
pub type Result<T> = std::result::Result<T, AgentError>;
