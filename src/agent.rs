//! Cache Agent
//!
//! Ties the router, strategy executors, cache storage, and lifecycle
//! together behind one interception surface. `handle` is infallible:
//! every intercepted request resolves to a deterministic response.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;

use crate::config::{Config, VersionedNames};
use crate::control::ControlMessage;
use crate::error::Result;
use crate::fetch::{Fetch, FetchRequest, FetchResponse};
use crate::lifecycle::{self, Lifecycle, WorkerState};
use crate::router::{self, RouteRules};
use crate::store::{CacheStats, CacheStorage};
use crate::strategy::{self, StrategyContext};

// == Cache Agent ==
/// The installable network-intercepting agent.
pub struct CacheAgent<F> {
    ctx: StrategyContext<F>,
    rules: RouteRules,
    lifecycle: RwLock<Lifecycle>,
}

impl<F: Fetch> CacheAgent<F> {
    // == Constructor ==
    /// Builds an agent from configuration and a fetch boundary.
    pub fn new(config: &Config, fetcher: F) -> Result<Self> {
        let canonical_origin = Url::parse(&config.upstream_url)?;
        let ctx = StrategyContext {
            storage: Arc::new(RwLock::new(CacheStorage::new(
                config.api_cache_limit,
                config.image_cache_limit,
            ))),
            fetcher: Arc::new(fetcher),
            names: VersionedNames::new(&config.build_version),
            canonical_origin,
        };

        Ok(Self {
            ctx,
            rules: RouteRules::from_config(config),
            lifecycle: RwLock::new(Lifecycle::new()),
        })
    }

    /// Shared handle to the cache storage, e.g. for the bundle download
    /// feature.
    pub fn storage(&self) -> Arc<RwLock<CacheStorage>> {
        self.ctx.storage.clone()
    }

    /// The canonical upstream origin requests are resolved against.
    pub fn origin(&self) -> &Url {
        &self.ctx.canonical_origin
    }

    /// The current build version tag.
    pub fn version(&self) -> &str {
        self.ctx.names.version()
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> WorkerState {
        self.lifecycle.read().await.state()
    }

    /// Aggregate cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.ctx.storage.read().await.stats()
    }

    // == Install ==
    /// Seeds caches and requests immediate activation.
    pub async fn install(&self) -> Result<()> {
        lifecycle::install(
            &self.ctx.storage,
            &self.ctx.fetcher,
            &self.ctx.names,
            &self.ctx.canonical_origin,
        )
        .await?;

        let mut lifecycle = self.lifecycle.write().await;
        lifecycle.installed()?;
        // Always-current deployments: trade a brief version-mixing window
        // for never sitting in waiting.
        lifecycle.request_skip_waiting();
        Ok(())
    }

    // == Activate ==
    /// Garbage-collects superseded versions and takes over traffic.
    pub async fn activate(&self) -> Result<()> {
        self.lifecycle.write().await.activating()?;
        lifecycle::activate(&self.ctx.storage, &self.ctx.names).await?;
        self.lifecycle.write().await.activated()?;
        info!(version = self.version(), "agent active");
        Ok(())
    }

    // == Start ==
    /// Full registration: install, then activate as soon as the install
    /// requested it.
    pub async fn start(&self) -> Result<()> {
        self.install().await?;
        if self.lifecycle.read().await.skip_requested() {
            self.activate().await?;
        }
        Ok(())
    }

    // == Handle ==
    /// Resolves one intercepted request. Never fails: offline callers get
    /// cached content, a bundle hit, or a synthesized typed response.
    pub async fn handle(&self, request: FetchRequest) -> FetchResponse {
        let class = router::classify(&request, &self.rules);
        debug!(method = %request.method, url = %request.url, ?class, "dispatching");
        strategy::execute(class, &request, &self.ctx).await
    }

    // == Handle Message ==
    /// Processes one control-channel message.
    pub async fn handle_message(&self, message: ControlMessage) {
        match message {
            ControlMessage::SkipWaiting => {
                let waiting = {
                    let mut lifecycle = self.lifecycle.write().await;
                    lifecycle.request_skip_waiting();
                    lifecycle.state() == WorkerState::Waiting
                };
                if waiting {
                    info!("skip waiting: promoting to active");
                    if let Err(err) = self.activate().await {
                        tracing::warn!(error = %err, "skip waiting promotion failed");
                    }
                }
            }
            ControlMessage::GetVersion { reply } => {
                // The caller may have gone away; nothing to do then.
                let _ = reply.send(self.version().to_string());
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::StubFetch;
    use tokio::sync::oneshot;

    fn agent() -> CacheAgent<StubFetch> {
        CacheAgent::new(&Config::default(), StubFetch::new()).unwrap()
    }

    #[tokio::test]
    async fn test_start_reaches_active() {
        let agent = agent();
        assert_eq!(agent.state().await, WorkerState::Installing);

        agent.start().await.unwrap();
        assert_eq!(agent.state().await, WorkerState::Active);
    }

    #[tokio::test]
    async fn test_get_version_replies() {
        let agent = agent();
        let (tx, rx) = oneshot::channel();

        agent
            .handle_message(ControlMessage::GetVersion { reply: tx })
            .await;
        assert_eq!(rx.await.unwrap(), "v1");
    }

    #[tokio::test]
    async fn test_skip_waiting_promotes_waiting_instance() {
        let agent = agent();
        agent.install().await.unwrap();
        assert_eq!(agent.state().await, WorkerState::Waiting);

        agent.handle_message(ControlMessage::SkipWaiting).await;
        assert_eq!(agent.state().await, WorkerState::Active);
    }

    #[tokio::test]
    async fn test_skip_waiting_noop_when_active() {
        let agent = agent();
        agent.start().await.unwrap();

        agent.handle_message(ControlMessage::SkipWaiting).await;
        assert_eq!(agent.state().await, WorkerState::Active);
    }

    #[tokio::test]
    async fn test_handle_is_infallible_offline() {
        let agent = agent();
        agent.start().await.unwrap();
        agent.ctx.fetcher.set_offline(true);

        let request = FetchRequest::get(
            Url::parse("http://localhost:8080/api/never-seen").unwrap(),
        );
        let response = agent.handle(request).await;
        assert_eq!(response.status, 503);
    }
}
