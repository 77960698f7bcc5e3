//! Cache Storage Manager
//!
//! Opens, enumerates, and deletes named caches; routes writes through the
//! size bound; and keeps the registry of known offline bundles.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::error::Result;
use crate::fetch::FetchResponse;
use crate::store::{CacheKey, CacheNamespace, CacheStats, Purpose};

// == Bundle Naming Convention ==
// `trip-{numeric id}-offline` is the contract shared with the offline
// download feature that creates and populates bundles.

/// Builds the conventional bundle name for a trip.
pub fn bundle_name(trip_id: u64) -> String {
    format!("trip-{}-offline", trip_id)
}

/// Parses a namespace name against the bundle convention.
pub fn parse_bundle_name(name: &str) -> Option<u64> {
    name.strip_prefix("trip-")?
        .strip_suffix("-offline")?
        .parse()
        .ok()
}

/// True when a name matches the bundle convention.
pub fn is_bundle_name(name: &str) -> bool {
    parse_bundle_name(name).is_some()
}

/// Extracts a trip identifier from an API path like `/api/trips/{id}/...`.
pub fn trip_id_from_path(path: &str) -> Option<u64> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty());
    match (segments.next(), segments.next(), segments.next()) {
        (Some("api"), Some("trips"), Some(id)) => id.parse().ok(),
        _ => None,
    }
}

// == Cache Storage ==
/// All named caches, the bundle registry, and aggregate statistics.
///
/// Bundle discovery goes through an explicit index of known trip
/// identifiers rather than parsing every namespace name on each lookup.
/// The index asserts nothing about a bundle's contents or completeness;
/// discovery still filters to namespaces that actually exist.
#[derive(Debug)]
pub struct CacheStorage {
    namespaces: HashMap<String, CacheNamespace>,
    bundle_index: BTreeSet<u64>,
    stats: CacheStats,
    api_limit: usize,
    image_limit: usize,
}

impl CacheStorage {
    // == Constructor ==
    /// Creates empty storage with per-purpose entry limits.
    pub fn new(api_limit: usize, image_limit: usize) -> Self {
        Self {
            namespaces: HashMap::new(),
            bundle_index: BTreeSet::new(),
            stats: CacheStats::new(),
            api_limit,
            image_limit,
        }
    }

    fn limit_for(&self, purpose: Purpose) -> Option<usize> {
        match purpose {
            Purpose::Api => Some(self.api_limit),
            Purpose::Image => Some(self.image_limit),
            Purpose::Static | Purpose::OfflineBundle => None,
        }
    }

    // == Open ==
    /// Idempotent open-or-create by name.
    ///
    /// Opening a conventionally named bundle also registers its trip id,
    /// so an index that drifted from reality heals itself.
    pub fn open(&mut self, name: &str) -> &mut CacheNamespace {
        if let Some(trip_id) = parse_bundle_name(name) {
            self.bundle_index.insert(trip_id);
        }
        let limit = self.limit_for(Purpose::of_name(name));
        self.namespaces
            .entry(name.to_string())
            .or_insert_with(|| CacheNamespace::new(name, limit))
    }

    /// Read-only access to a namespace, if it exists.
    pub fn get(&self, name: &str) -> Option<&CacheNamespace> {
        self.namespaces.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.namespaces.contains_key(name)
    }

    // == Delete ==
    /// Removes a namespace and, for bundles, its index entry.
    pub fn delete(&mut self, name: &str) -> bool {
        if let Some(trip_id) = parse_bundle_name(name) {
            self.bundle_index.remove(&trip_id);
        }
        let removed = self.namespaces.remove(name).is_some();
        if removed {
            self.stats.set_total_entries(self.total_entries());
        }
        removed
    }

    // == Names ==
    /// All namespace names, sorted for deterministic enumeration.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.namespaces.keys().cloned().collect();
        names.sort();
        names
    }

    // == Put ==
    /// Writes through the named cache, creating it lazily on first write.
    pub fn put(&mut self, name: &str, key: CacheKey, response: FetchResponse) -> Result<()> {
        let evicted = self.open(name).put(key, response)?;
        if evicted > 0 {
            debug!(namespace = %name, evicted, "bulk eviction");
            self.stats.record_evictions(evicted as u64);
        }
        self.stats.set_total_entries(self.total_entries());
        Ok(())
    }

    // == Lookup ==
    /// Full request match against one namespace, recording hit or miss.
    pub fn lookup(&mut self, name: &str, key: &CacheKey) -> Option<FetchResponse> {
        let found = self
            .namespaces
            .get(name)
            .and_then(|namespace| namespace.match_request(key))
            .cloned();
        match found {
            Some(_) => self.stats.record_hit(),
            None => self.stats.record_miss(),
        }
        found
    }

    /// Records a hit found outside [`lookup`], e.g. in the bundle cascade.
    pub fn record_hit(&mut self) {
        self.stats.record_hit();
    }

    /// Records a definitive miss after an exhaustive search.
    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    // == Bundle Registry ==
    /// Entry point for the external download feature: creates the bundle
    /// namespace and registers its trip id.
    pub fn register_bundle(&mut self, trip_id: u64) -> &mut CacheNamespace {
        self.bundle_index.insert(trip_id);
        let name = bundle_name(trip_id);
        self.open(&name)
    }

    /// True when the trip has a registered, existing bundle.
    pub fn has_bundle(&self, trip_id: u64) -> bool {
        self.bundle_index.contains(&trip_id) && self.namespaces.contains_key(&bundle_name(trip_id))
    }

    // == Discover Offline Bundles ==
    /// Enumerates registered bundles that actually exist, id order.
    ///
    /// Nothing is assumed about creation order or completeness.
    pub fn discover_offline_bundles(&self) -> Vec<&CacheNamespace> {
        self.bundle_index
            .iter()
            .filter_map(|trip_id| self.namespaces.get(&bundle_name(*trip_id)))
            .collect()
    }

    // == Totals ==
    /// Entry count across all namespaces.
    pub fn total_entries(&self) -> usize {
        self.namespaces.values().map(|namespace| namespace.len()).sum()
    }

    // == Stats ==
    /// Current aggregate statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.total_entries());
        stats
    }
}
