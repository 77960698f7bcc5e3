//! Network-first strategy
//!
//! One parameterized executor covers every network-first variant: plain
//! (no storing), navigation (HTTP caching disabled outbound), and API
//! (store into the api namespace plus progressive mirroring into the
//! requested trip's offline bundle).

use tracing::{debug, warn};

use crate::error::Result;
use crate::fetch::{CacheMode, Fetch, FetchOptions, FetchRequest, FetchResponse};
use crate::store::{bundle_name, trip_id_from_path, CacheStorage};
use crate::strategy::{fallback, StrategyContext};

// == Options ==
/// Capability flags for one network-first invocation.
#[derive(Debug, Clone, Default)]
pub struct NetworkFirstOptions {
    /// Namespace successful GET responses are stored into; None = no storing
    pub store_into: Option<String>,
    /// Mirror trip-scoped responses into that trip's offline bundle
    pub mirror: bool,
    /// Outbound HTTP cache override
    pub cache: CacheMode,
    /// Namespaces the fallback cascade checks before the bundles
    pub fallback_namespaces: Vec<String>,
}

// == Run ==
/// Fetches the network, storing and mirroring on success; on network
/// failure resolves through the fallback cascade. A non-2xx response is
/// returned to the caller unmodified.
pub async fn run<F: Fetch>(
    request: &FetchRequest,
    ctx: &StrategyContext<F>,
    options: NetworkFirstOptions,
) -> Result<FetchResponse> {
    let fetch_options = FetchOptions {
        cache: options.cache,
        ..FetchOptions::default()
    };

    match ctx.fetcher.fetch(request, fetch_options).await {
        Ok(response) => {
            if request.method == "GET" && response.is_success() {
                if let Some(name) = &options.store_into {
                    let mut storage = ctx.storage.write().await;
                    if let Err(err) = storage.put(name, request.key(), response.clone()) {
                        // A failed cache write never invalidates a good response.
                        warn!(namespace = %name, error = %err, "cache write failed");
                    }
                    if options.mirror {
                        mirror_into_bundle(&mut storage, request, &response);
                    }
                }
            }
            Ok(response)
        }
        Err(err) => {
            debug!(url = %request.url, error = %err, "network failed, entering fallback cascade");
            Ok(fallback::resolve(request, ctx, &options.fallback_namespaces).await)
        }
    }
}

// == Progressive Mirroring ==
/// Best-effort write-through into the trip's offline bundle.
///
/// Bundles are created by the download feature; a trip without a
/// registered bundle is skipped, and write failures are swallowed.
fn mirror_into_bundle(storage: &mut CacheStorage, request: &FetchRequest, response: &FetchResponse) {
    let Some(trip_id) = trip_id_from_path(request.url.path()) else {
        return;
    };
    if !storage.has_bundle(trip_id) {
        debug!(trip_id, "no offline bundle for trip, skipping mirror");
        return;
    }

    let name = bundle_name(trip_id);
    match storage.put(&name, request.key(), response.clone()) {
        Ok(()) => debug!(bundle = %name, url = %request.url, "mirrored into offline bundle"),
        Err(err) => warn!(bundle = %name, error = %err, "bundle mirror failed"),
    }
}
