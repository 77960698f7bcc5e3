//! Response snapshot
//!
//! A fully buffered copy of an upstream response: status, headers, body,
//! and the opaque flag. Snapshots are what the cache stores and what the
//! strategies hand back to the caller.

// == Fetch Response ==
/// A buffered response, cacheable and cloneable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers in arrival order
    pub headers: Vec<(String, String)>,
    /// Full response body
    pub body: Vec<u8>,
    /// True for cross-origin no-cors responses
    pub opaque: bool,
}

impl FetchResponse {
    /// Creates a response with a body and content type.
    pub fn with_body(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
            opaque: false,
        }
    }

    /// Marks the response opaque.
    pub fn into_opaque(mut self) -> Self {
        self.opaque = true;
        self
    }

    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// True when the response may be stored: 2xx, or opaque.
    ///
    /// Opaque responses hide their real status, so they are stored on faith;
    /// anything else non-2xx is a server-side answer, not cache material.
    pub fn is_cacheable(&self) -> bool {
        self.is_success() || self.opaque
    }

    /// First header with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Body interpreted as UTF-8, lossy.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
