//! Response DTOs for the agent's reserved endpoints
//!
//! Defines the structure of outgoing control and diagnostics bodies.

use serde::Serialize;

/// Reply to a GET_VERSION control message
#[derive(Debug, Clone, Serialize)]
pub struct VersionResponse {
    /// The agent's build version tag
    pub version: String,
}

impl VersionResponse {
    /// Creates a new VersionResponse
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }
}

/// Acknowledgement for control messages without a payload
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Outcome description
    pub message: String,
}

impl MessageResponse {
    /// Creates a new MessageResponse
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Response body for the stats endpoint (GET /_agent/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of entries removed by bulk eviction
    pub evictions: u64,
    /// Current number of entries across all namespaces
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(hits: u64, misses: u64, evictions: u64, total_entries: usize) -> Self {
        let total_lookups = hits + misses;
        let hit_rate = if total_lookups > 0 {
            hits as f64 / total_lookups as f64
        } else {
            0.0
        };
        Self {
            hits,
            misses,
            evictions,
            total_entries,
            hit_rate,
        }
    }
}

/// Response body for the health endpoint (GET /_agent/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// The agent's build version tag
    pub version: String,
    /// Current lifecycle state
    pub state: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(version: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            version: version.into(),
            state: state.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
