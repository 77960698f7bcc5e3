//! Background Refresh Task
//!
//! The stale-while-revalidate executor answers from cache and hands the
//! network round trip to this task. Outcomes only ever reach the logs; a
//! stale entry stays in place until a refresh actually succeeds.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::fetch::{Fetch, FetchOptions, FetchRequest};
use crate::store::CacheStorage;

/// Spawns an unawaited fetch-and-store for a cached entry.
///
/// # Arguments
/// * `storage` - Shared cache storage
/// * `fetcher` - Fetch boundary
/// * `namespace` - Namespace the refreshed snapshot is stored into
/// * `request` - The request to re-fetch
///
/// # Returns
/// A JoinHandle for the spawned task. Callers on the response path drop
/// it; tests may await it.
pub fn spawn_refresh<F: Fetch>(
    storage: Arc<RwLock<CacheStorage>>,
    fetcher: Arc<F>,
    namespace: String,
    request: FetchRequest,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        match fetcher.fetch(&request, FetchOptions::default()).await {
            Ok(response) if response.is_cacheable() => {
                let mut storage = storage.write().await;
                match storage.put(&namespace, request.key(), response) {
                    Ok(()) => debug!(url = %request.url, namespace = %namespace, "background refresh stored"),
                    Err(err) => {
                        warn!(url = %request.url, error = %err, "background refresh store failed")
                    }
                }
            }
            Ok(response) => {
                debug!(url = %request.url, status = response.status, "background refresh skipped non-success")
            }
            Err(err) => debug!(url = %request.url, error = %err, "background refresh failed"),
        }
    })
}
