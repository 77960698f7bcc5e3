//! Property-Based Tests for the Cache Store
//!
//! Uses proptest to verify the size bound, eviction ordering, and the
//! bundle naming contract.

use proptest::prelude::*;

use crate::fetch::FetchResponse;
use crate::store::{bundle_name, parse_bundle_name, CacheKey, CacheNamespace, CacheStorage};

// == Test Configuration ==
const TEST_LIMIT: usize = 20;

// == Strategies ==
/// Generates URL path suffixes for cache keys.
fn path_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9]{1,12}".prop_map(|segment| format!("/api/items/{}", segment))
}

fn key_for(path: &str) -> CacheKey {
    CacheKey::new("GET", format!("http://localhost:8080{}", path))
}

fn ok() -> FetchResponse {
    FetchResponse::with_body(200, "application/json", "{}")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For a namespace with limit L, after any sequence of successful
    // writes the namespace never holds more than L items between writes.
    #[test]
    fn prop_size_bound_holds_between_writes(paths in prop::collection::vec(path_strategy(), 1..120)) {
        let mut namespace = CacheNamespace::new("api-v1", Some(TEST_LIMIT));

        for path in &paths {
            namespace.put(key_for(path), ok()).unwrap();
            prop_assert!(
                namespace.len() <= TEST_LIMIT,
                "len {} exceeded limit {}",
                namespace.len(),
                TEST_LIMIT
            );
        }
    }

    // Bulk eviction removes from the front of the insertion order: after
    // writing a sequence of distinct keys, the surviving keys form a
    // suffix of the insertion order.
    #[test]
    fn prop_eviction_removes_oldest_first(path_set in prop::collection::hash_set(path_strategy(), 1..120)) {
        let mut namespace = CacheNamespace::new("api-v1", Some(TEST_LIMIT));
        let insertion_order: Vec<String> = path_set.into_iter().collect();

        for path in &insertion_order {
            namespace.put(key_for(path), ok()).unwrap();
        }

        let survivors: Vec<String> = namespace
            .keys()
            .filter_map(|key| key.pathname())
            .collect();
        let expected_suffix = &insertion_order[insertion_order.len() - survivors.len()..];
        prop_assert_eq!(survivors.as_slice(), expected_suffix);
    }

    // The bundle naming convention round-trips for every trip id.
    #[test]
    fn prop_bundle_name_round_trip(trip_id in any::<u64>()) {
        prop_assert_eq!(parse_bundle_name(&bundle_name(trip_id)), Some(trip_id));
    }

    // Names outside the convention never parse as bundles.
    #[test]
    fn prop_non_bundle_names_rejected(name in "[a-z]{1,8}-v[0-9]{1,3}") {
        prop_assert_eq!(parse_bundle_name(&name), None);
    }

    // Hit/miss accounting matches observed lookup outcomes.
    #[test]
    fn prop_stats_accuracy(
        stored in prop::collection::vec(path_strategy(), 1..20),
        probed in prop::collection::vec(path_strategy(), 1..40),
    ) {
        let mut storage = CacheStorage::new(100, 500);
        for path in &stored {
            storage.put("api-v1", key_for(path), ok()).unwrap();
        }

        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;
        for path in &probed {
            match storage.lookup("api-v1", &key_for(path)) {
                Some(_) => expected_hits += 1,
                None => expected_misses += 1,
            }
        }

        let stats = storage.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, storage.total_entries());
    }
}
