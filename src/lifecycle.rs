//! Lifecycle Controller Module
//!
//! Install/activate transitions and the agent instance state machine.
//! Install seeds the static namespace and prefetches critical API data;
//! activate garbage-collects superseded-version namespaces while leaving
//! offline bundles untouched, then claims open contexts.

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};
use url::Url;

use crate::config::VersionedNames;
use crate::error::{AgentError, Result};
use crate::fetch::{Fetch, FetchOptions, FetchRequest};
use crate::store::{is_bundle_name, CacheStorage};

// == Precache Manifest ==
/// Critical assets seeded at install. The root document is deliberately
/// absent: document-level metadata must stay fresh on every navigation.
pub const PRECACHE_MANIFEST: &[&str] = &[
    "/manifest.json",
    "/favicon.svg",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
    "/assets/index.js",
    "/assets/index.css",
];

/// API endpoints prefetched best-effort at install.
pub const CRITICAL_API_ENDPOINTS: &[&str] = &["/api/trips", "/api/settings"];

// == Worker State ==
/// Agent instance lifecycle states.
///
/// Transitions are host-driven except for the explicit skip-waiting
/// shortcut; `Redundant` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Installing,
    Waiting,
    Activating,
    Active,
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Installing => "installing",
            WorkerState::Waiting => "waiting",
            WorkerState::Activating => "activating",
            WorkerState::Active => "active",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

// == Lifecycle ==
/// The state machine for one agent instance.
#[derive(Debug)]
pub struct Lifecycle {
    state: WorkerState,
    skip_waiting: bool,
}

impl Lifecycle {
    /// A freshly registered instance starts installing.
    pub fn new() -> Self {
        Self {
            state: WorkerState::Installing,
            skip_waiting: false,
        }
    }

    pub fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether immediate activation has been requested.
    pub fn skip_requested(&self) -> bool {
        self.skip_waiting
    }

    /// Requests immediate activation, bypassing the multi-tab wait.
    pub fn request_skip_waiting(&mut self) {
        self.skip_waiting = true;
    }

    fn transition(&mut self, from: WorkerState, to: WorkerState) -> Result<()> {
        if self.state != from {
            return Err(AgentError::InvalidTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }

    /// Installing -> Waiting.
    pub fn installed(&mut self) -> Result<()> {
        self.transition(WorkerState::Installing, WorkerState::Waiting)
    }

    /// Waiting -> Activating.
    pub fn activating(&mut self) -> Result<()> {
        self.transition(WorkerState::Waiting, WorkerState::Activating)
    }

    /// Activating -> Active.
    pub fn activated(&mut self) -> Result<()> {
        self.transition(WorkerState::Activating, WorkerState::Active)
    }

    /// Any state -> Redundant, once superseded.
    pub fn retire(&mut self) {
        self.state = WorkerState::Redundant;
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

// == Install ==
/// Seeds the current-version static namespace with the precache manifest
/// and best-effort-prefetches critical API endpoints.
///
/// A manifest asset failure fails install; a prefetch failure never does.
pub async fn install<F: Fetch>(
    storage: &Arc<RwLock<CacheStorage>>,
    fetcher: &Arc<F>,
    names: &VersionedNames,
    origin: &Url,
) -> Result<()> {
    info!(version = names.version(), "installing agent");
    let statics = names.static_assets();

    for path in PRECACHE_MANIFEST {
        let request = FetchRequest::get(origin.join(path)?);
        let response = fetcher
            .fetch(&request, FetchOptions::default())
            .await
            .map_err(|err| AgentError::InstallFailed(format!("precache {}: {}", path, err)))?;
        if !response.is_success() {
            return Err(AgentError::InstallFailed(format!(
                "precache {}: status {}",
                path, response.status
            )));
        }
        storage
            .write()
            .await
            .put(&statics, request.key(), response)
            .map_err(|err| AgentError::InstallFailed(format!("precache {}: {}", path, err)))?;
    }
    info!(count = PRECACHE_MANIFEST.len(), "static assets precached");

    let api = names.api();
    for path in CRITICAL_API_ENDPOINTS {
        let request = FetchRequest::get(origin.join(path)?);
        match fetcher.fetch(&request, FetchOptions::default()).await {
            Ok(response) if response.is_success() => {
                if let Err(err) = storage.write().await.put(&api, request.key(), response) {
                    warn!(endpoint = %path, error = %err, "prefetch store failed");
                }
            }
            Ok(response) => {
                warn!(endpoint = %path, status = response.status, "prefetch skipped non-success")
            }
            Err(err) => warn!(endpoint = %path, error = %err, "prefetch failed"),
        }
    }

    Ok(())
}

// == Activate ==
/// Deletes every namespace that is neither in the current-version
/// allow-list nor an offline bundle, then claims open contexts.
///
/// Bundles survive version upgrades unconditionally.
pub async fn activate(storage: &Arc<RwLock<CacheStorage>>, names: &VersionedNames) -> Result<()> {
    let mut storage = storage.write().await;
    let allowlist = names.allowlist();

    let stale: Vec<String> = storage
        .names()
        .into_iter()
        .filter(|name| !allowlist.contains(name) && !is_bundle_name(name))
        .collect();
    for name in &stale {
        info!(namespace = %name, "deleting superseded namespace");
        storage.delete(name);
    }

    info!(version = names.version(), "claiming open contexts");
    Ok(())
}
