//! Stale-while-revalidate strategy
//!
//! Serves build-output assets: a cached response returns immediately while
//! an unawaited background task refreshes the entry. With nothing cached
//! the network is awaited directly; if that also fails, a minimal offline
//! document is returned.

use crate::error::Result;
use crate::fetch::{Fetch, FetchOptions, FetchRequest, FetchResponse};
use crate::strategy::{offline, StrategyContext};
use crate::tasks;
use tracing::warn;

// == Run ==
pub async fn run<F: Fetch>(
    request: &FetchRequest,
    ctx: &StrategyContext<F>,
) -> Result<FetchResponse> {
    let statics = ctx.names.static_assets();
    let cached = {
        let mut storage = ctx.storage.write().await;
        storage.lookup(&statics, &request.key())
    };

    if let Some(response) = cached {
        // Refresh happens off the response path; the handle is dropped.
        tasks::spawn_refresh(
            ctx.storage.clone(),
            ctx.fetcher.clone(),
            statics,
            request.clone(),
        );
        return Ok(response);
    }

    match ctx.fetcher.fetch(request, FetchOptions::default()).await {
        Ok(response) => {
            if request.method == "GET" && response.is_cacheable() {
                let mut storage = ctx.storage.write().await;
                if let Err(err) = storage.put(&statics, request.key(), response.clone()) {
                    warn!(namespace = %statics, error = %err, "asset cache write failed");
                }
            }
            Ok(response)
        }
        Err(_) => Ok(offline::offline_document()),
    }
}
