//! Strategy Executors Module
//!
//! One executor per policy class, all consuming the shared strategy
//! context. The dispatcher guarantees a response for every request: any
//! error escaping an executor becomes the generic network-error 503.

pub mod cache_first;
pub mod fallback;
pub mod network_first;
pub mod offline;
pub mod passthrough;
pub mod revalidate;

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;
use url::Url;

use crate::config::VersionedNames;
use crate::fetch::{CacheMode, Fetch, FetchRequest, FetchResponse};
use crate::router::RouteClass;
use crate::store::CacheStorage;

use network_first::NetworkFirstOptions;

// == Strategy Context ==
/// Everything an executor needs: the cache storage, the fetch boundary,
/// the current-version namespace names, and the canonical upstream origin.
#[derive(Debug)]
pub struct StrategyContext<F> {
    pub storage: Arc<RwLock<CacheStorage>>,
    pub fetcher: Arc<F>,
    pub names: VersionedNames,
    pub canonical_origin: Url,
}

impl<F> Clone for StrategyContext<F> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            fetcher: self.fetcher.clone(),
            names: self.names.clone(),
            canonical_origin: self.canonical_origin.clone(),
        }
    }
}

// == Dispatch ==
/// Runs the executor selected by the router.
pub async fn execute<F: Fetch>(
    class: RouteClass,
    request: &FetchRequest,
    ctx: &StrategyContext<F>,
) -> FetchResponse {
    let result = match class {
        RouteClass::AdminPassthrough => passthrough::run(request, ctx).await,
        RouteClass::Navigation => {
            // Cached content only after the network call itself fails.
            network_first::run(
                request,
                ctx,
                NetworkFirstOptions {
                    cache: CacheMode::NoStore,
                    fallback_namespaces: vec![ctx.names.static_assets(), ctx.names.api()],
                    ..NetworkFirstOptions::default()
                },
            )
            .await
        }
        RouteClass::ApiGet => {
            network_first::run(
                request,
                ctx,
                NetworkFirstOptions {
                    store_into: Some(ctx.names.api()),
                    mirror: true,
                    cache: CacheMode::Default,
                    fallback_namespaces: vec![ctx.names.api()],
                },
            )
            .await
        }
        RouteClass::Image => cache_first::run(request, ctx).await,
        RouteClass::StaticAsset => revalidate::run(request, ctx).await,
        RouteClass::Default => {
            network_first::run(
                request,
                ctx,
                NetworkFirstOptions {
                    fallback_namespaces: vec![ctx.names.static_assets(), ctx.names.api()],
                    ..NetworkFirstOptions::default()
                },
            )
            .await
        }
    };

    match result {
        Ok(response) => response,
        Err(err) => {
            warn!(url = %request.url, error = %err, "strategy failed, returning network error");
            offline::network_error()
        }
    }
}
