//! Cache Entry Module
//!
//! Defines the key and entry structure for cached response snapshots.

use std::fmt;

use chrono::{DateTime, Utc};
use url::Url;

use crate::fetch::FetchResponse;

// == Cache Key ==
/// Entries are keyed by (method, absolute URL).
///
/// The URL is kept exactly as the writer supplied it. Offline bundles are
/// populated by an external feature, so representation drift between a
/// stored key and a live request (host casing, origin) is expected; the
/// fallback cascade compensates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Uppercase HTTP method
    pub method: String,
    /// Absolute URL string as written
    pub url: String,
}

impl CacheKey {
    /// Creates a key, normalizing the method to uppercase.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url: url.into(),
        }
    }

    /// Path component of the stored URL, if it parses.
    pub fn pathname(&self) -> Option<String> {
        Url::parse(&self.url).ok().map(|url| url.path().to_string())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

// == Cached Entry ==
/// A stored response snapshot with its insertion position.
///
/// Insertion order is the only ordering signal; there is no recency index.
#[derive(Debug, Clone)]
pub struct CachedEntry {
    /// The stored response snapshot
    pub response: FetchResponse,
    /// Monotonic per-namespace insertion sequence
    pub sequence: u64,
    /// Wall-clock write time, for diagnostics
    pub stored_at: DateTime<Utc>,
}

impl CachedEntry {
    /// Creates an entry stamped with the current time.
    pub fn new(response: FetchResponse, sequence: u64) -> Self {
        Self {
            response,
            sequence,
            stored_at: Utc::now(),
        }
    }
}
