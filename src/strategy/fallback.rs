//! Fallback Resolution Cascade
//!
//! Runs after a primary miss plus network failure. Searches the primary
//! namespaces by full request, then every discovered offline bundle
//! through four tiers of decreasing strictness, before synthesizing a
//! typed offline response.

use tracing::debug;
use url::Url;

use crate::fetch::{Fetch, FetchRequest, FetchResponse};
use crate::store::CacheStorage;
use crate::strategy::{offline, StrategyContext};

// == Resolve ==
/// Resolves a request that the network could not serve.
pub async fn resolve<F: Fetch>(
    request: &FetchRequest,
    ctx: &StrategyContext<F>,
    primaries: &[String],
) -> FetchResponse {
    let mut storage = ctx.storage.write().await;

    let key = request.key();
    for name in primaries {
        if let Some(response) = storage.lookup(name, &key) {
            debug!(url = %request.url, namespace = %name, "served from primary namespace");
            return response;
        }
    }

    if let Some(response) = search_bundles(&storage, request, &ctx.canonical_origin) {
        storage.record_hit();
        return response;
    }

    drop(storage);
    debug!(url = %request.url, "every fallback tier missed, synthesizing");
    offline::synthesize(request)
}

// == Bundle Search ==
/// Searches every discovered bundle, tier by tier:
/// (a) full request match;
/// (b) URL-string match;
/// (c) the request URL re-rooted on the canonical origin, covering origin
///     mismatches between stored keys and the live request;
/// (d) key iteration comparing parsed pathnames, covering representation
///     drift such as host casing.
fn search_bundles(
    storage: &CacheStorage,
    request: &FetchRequest,
    canonical_origin: &Url,
) -> Option<FetchResponse> {
    let bundles = storage.discover_offline_bundles();
    if bundles.is_empty() {
        return None;
    }

    let key = request.key();
    for bundle in &bundles {
        if let Some(response) = bundle.match_request(&key) {
            debug!(bundle = %bundle.name(), "bundle hit: request match");
            return Some(response.clone());
        }
    }

    let url = request.url.as_str();
    for bundle in &bundles {
        if let Some(response) = bundle.match_url(url) {
            debug!(bundle = %bundle.name(), "bundle hit: url match");
            return Some(response.clone());
        }
    }

    if let Some(rebased) = rebase_origin(&request.url, canonical_origin) {
        for bundle in &bundles {
            if let Some(response) = bundle.match_url(&rebased) {
                debug!(bundle = %bundle.name(), "bundle hit: canonical origin match");
                return Some(response.clone());
            }
        }
    }

    let path = request.url.path();
    for bundle in &bundles {
        if let Some(response) = bundle.match_pathname(path) {
            debug!(bundle = %bundle.name(), "bundle hit: pathname match");
            return Some(response.clone());
        }
    }

    None
}

/// Rewrites a URL onto the canonical origin, keeping path and query.
fn rebase_origin(url: &Url, canonical_origin: &Url) -> Option<String> {
    let mut target = canonical_origin.join(url.path()).ok()?;
    target.set_query(url.query());
    Some(target.to_string())
}
