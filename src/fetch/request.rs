//! Intercepted request representation
//!
//! Mirrors the standard fetch request contract: method, absolute URL, mode,
//! and destination. The agent never mutates a request; the only outbound
//! adjustments are the option overrides in [`FetchOptions`].

use url::Url;

use crate::store::CacheKey;

// == Request Mode ==
/// How the request relates to its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// Top-level document load
    Navigate,
    /// Cross-origin request with CORS semantics
    Cors,
    /// Cross-origin request without CORS; responses become opaque
    NoCors,
    /// Same-origin only
    SameOrigin,
}

impl RequestMode {
    /// Parses a `Sec-Fetch-Mode` header value.
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "navigate" => RequestMode::Navigate,
            "no-cors" => RequestMode::NoCors,
            "same-origin" => RequestMode::SameOrigin,
            _ => RequestMode::Cors,
        }
    }
}

// == Request Destination ==
/// What the requesting context will do with the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDestination {
    Document,
    Script,
    Style,
    Image,
    Font,
    /// Anything else (fetch/XHR, workers, unknown)
    Empty,
}

impl RequestDestination {
    /// Parses a `Sec-Fetch-Dest` header value.
    pub fn from_header(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "document" => RequestDestination::Document,
            "script" => RequestDestination::Script,
            "style" => RequestDestination::Style,
            "image" => RequestDestination::Image,
            "font" => RequestDestination::Font,
            _ => RequestDestination::Empty,
        }
    }
}

// == Fetch Request ==
/// A single intercepted request.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Uppercase HTTP method
    pub method: String,
    /// Absolute request URL
    pub url: Url,
    /// Request mode
    pub mode: RequestMode,
    /// Request destination
    pub destination: RequestDestination,
}

impl FetchRequest {
    /// Creates a request with explicit method and URL.
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        Self {
            method: method.into().to_ascii_uppercase(),
            url,
            mode: RequestMode::Cors,
            destination: RequestDestination::Empty,
        }
    }

    /// Convenience constructor for a plain GET.
    pub fn get(url: Url) -> Self {
        Self::new("GET", url)
    }

    /// Sets the request mode.
    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the request destination.
    pub fn with_destination(mut self, destination: RequestDestination) -> Self {
        self.destination = destination;
        self
    }

    /// The cache key this request resolves under: (method, absolute URL).
    pub fn key(&self) -> CacheKey {
        CacheKey::new(&self.method, self.url.as_str())
    }

    /// True for document loads.
    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate || self.destination == RequestDestination::Document
    }

    /// True when the request targets an origin other than `origin`.
    pub fn is_cross_origin(&self, origin: &Url) -> bool {
        self.url.origin() != origin.origin()
    }
}

// == Outbound Option Overrides ==
/// HTTP-level cache behavior requested from the transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheMode {
    /// Transport may use its own cache
    #[default]
    Default,
    /// Bypass every HTTP-level cache
    NoStore,
}

/// The only outbound overrides the agent ever applies.
///
/// Navigation requests disable HTTP-level caching; cross-origin image
/// requests go out with CORS and no credentials so opaque responses remain
/// usable. The request itself is never otherwise mutated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchOptions {
    pub cache: CacheMode,
    pub cors_no_credentials: bool,
}
