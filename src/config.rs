//! Configuration Module
//!
//! Handles loading and managing agent configuration from environment variables.

use std::env;

use crate::store::{DEFAULT_API_LIMIT, DEFAULT_IMAGE_LIMIT};

/// Agent configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend being proxied
    pub upstream_url: String,
    /// HTTP server port
    pub server_port: u16,
    /// Build version tag; namespaces are scoped to it
    pub build_version: String,
    /// Maximum number of entries in the API namespace
    pub api_cache_limit: usize,
    /// Maximum number of entries in the image namespace
    pub image_cache_limit: usize,
    /// Upstream fetch deadline in seconds
    pub fetch_timeout_secs: u64,
    /// Hosts whose responses are treated as images regardless of path
    pub image_hosts: Vec<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `UPSTREAM_URL` - Backend base URL (default: http://localhost:8080)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `BUILD_VERSION` - Version tag for namespace scoping (default: v1)
    /// - `API_CACHE_LIMIT` - API namespace entry limit (default: 100)
    /// - `IMAGE_CACHE_LIMIT` - Image namespace entry limit (default: 500)
    /// - `FETCH_TIMEOUT_SECS` - Upstream fetch deadline (default: 10)
    /// - `IMAGE_HOSTS` - Comma-separated image host allow-list
    pub fn from_env() -> Self {
        Self {
            upstream_url: env::var("UPSTREAM_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            build_version: env::var("BUILD_VERSION").unwrap_or_else(|_| "v1".to_string()),
            api_cache_limit: env::var("API_CACHE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_API_LIMIT),
            image_cache_limit: env::var("IMAGE_CACHE_LIMIT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_IMAGE_LIMIT),
            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            image_hosts: env::var("IMAGE_HOSTS")
                .map(|v| parse_host_list(&v))
                .unwrap_or_default(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            upstream_url: "http://localhost:8080".to_string(),
            server_port: 3000,
            build_version: "v1".to_string(),
            api_cache_limit: DEFAULT_API_LIMIT,
            image_cache_limit: DEFAULT_IMAGE_LIMIT,
            fetch_timeout_secs: 10,
            image_hosts: Vec::new(),
        }
    }
}

fn parse_host_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|host| host.trim().to_ascii_lowercase())
        .filter(|host| !host.is_empty())
        .collect()
}

// == Versioned Namespace Names ==
/// Derives the current-version namespace names and the activation allow-list.
///
/// Exactly one namespace exists per purpose per build version; superseded
/// versions are deleted on activation.
#[derive(Debug, Clone)]
pub struct VersionedNames {
    version: String,
}

impl VersionedNames {
    /// Creates namespace names scoped to the given version tag.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// The version tag itself.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Namespace seeded at install with the precache manifest.
    pub fn static_assets(&self) -> String {
        format!("static-{}", self.version)
    }

    /// Namespace holding API responses, created lazily on first write.
    pub fn api(&self) -> String {
        format!("api-{}", self.version)
    }

    /// Namespace holding image responses, created lazily on first write.
    pub fn images(&self) -> String {
        format!("images-{}", self.version)
    }

    /// Names that survive activation of this version.
    pub fn allowlist(&self) -> [String; 3] {
        [self.static_assets(), self.api(), self.images()]
    }
}
