//! Cache Namespace Module
//!
//! A single named cache: a map of response snapshots keyed by
//! (method, absolute URL) with an insertion-order index and a soft,
//! amortized size bound.

use std::collections::HashMap;

use crate::error::{AgentError, Result};
use crate::fetch::FetchResponse;
use crate::store::{is_bundle_name, CacheKey, CachedEntry, OrderTracker, MAX_BODY_BYTES};

// == Namespace Purpose ==
/// Resource class a namespace serves, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Static,
    Api,
    Image,
    OfflineBundle,
}

impl Purpose {
    /// Derives the purpose from a namespace name.
    pub fn of_name(name: &str) -> Self {
        if is_bundle_name(name) {
            Purpose::OfflineBundle
        } else if name.starts_with("api-") {
            Purpose::Api
        } else if name.starts_with("images-") {
            Purpose::Image
        } else {
            Purpose::Static
        }
    }
}

// == Cache Namespace ==
/// A bounded, named cache of request/response pairs.
#[derive(Debug)]
pub struct CacheNamespace {
    /// Namespace name
    name: String,
    /// Resource class, derived from the name
    purpose: Purpose,
    /// Entry limit; None = unbounded
    limit: Option<usize>,
    /// Key-value storage
    entries: HashMap<CacheKey, CachedEntry>,
    /// Insertion-order index
    order: OrderTracker,
    /// Monotonic insertion counter
    sequence: u64,
}

impl CacheNamespace {
    // == Constructor ==
    /// Creates a namespace with an optional entry limit.
    pub fn new(name: impl Into<String>, limit: Option<usize>) -> Self {
        let name = name.into();
        let purpose = Purpose::of_name(&name);
        Self {
            name,
            purpose,
            limit,
            entries: HashMap::new(),
            order: OrderTracker::new(),
            sequence: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Put ==
    /// Stores a response snapshot, enforcing the size bound.
    ///
    /// When a new key arrives while the count has reached the limit, the
    /// oldest ~10% of keys by insertion order are evicted first. The bound
    /// is soft and amortized, not strict LRU: exactness is traded for O(1)
    /// write cost.
    ///
    /// Returns the number of entries evicted by this write.
    pub fn put(&mut self, key: CacheKey, response: FetchResponse) -> Result<usize> {
        if response.body.len() > MAX_BODY_BYTES {
            return Err(AgentError::CacheWrite(format!(
                "body of {} exceeds {} bytes",
                key,
                MAX_BODY_BYTES
            )));
        }

        let mut evicted = 0;
        if let Some(limit) = self.limit {
            if !self.entries.contains_key(&key) && self.entries.len() >= limit {
                let batch = limit.div_ceil(10).max(1);
                for old in self.order.take_oldest(batch) {
                    self.entries.remove(&old);
                    evicted += 1;
                }
            }
        }

        self.sequence += 1;
        self.entries
            .insert(key.clone(), CachedEntry::new(response, self.sequence));
        self.order.record(&key);

        Ok(evicted)
    }

    // == Match Request ==
    /// Full request match: method and URL string must both agree.
    pub fn match_request(&self, key: &CacheKey) -> Option<&FetchResponse> {
        self.entries.get(key).map(|entry| &entry.response)
    }

    // == Match URL ==
    /// URL-string match regardless of method, oldest entry first.
    pub fn match_url(&self, url: &str) -> Option<&FetchResponse> {
        self.order
            .iter()
            .find(|key| key.url == url)
            .and_then(|key| self.match_request(key))
    }

    // == Match Pathname ==
    /// Key-iteration match comparing parsed pathnames.
    ///
    /// Covers representation drift between a stored key and a live request
    /// (host casing, origin differences).
    pub fn match_pathname(&self, path: &str) -> Option<&FetchResponse> {
        self.order
            .iter()
            .find(|key| key.pathname().as_deref() == Some(path))
            .and_then(|key| self.match_request(key))
    }

    // == Delete ==
    /// Removes an entry by key.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }

    // == Keys ==
    /// Iterates keys oldest-first.
    pub fn keys(&self) -> impl Iterator<Item = &CacheKey> {
        self.order.iter()
    }
}
