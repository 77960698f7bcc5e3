//! Offline Agent - an offline-first caching proxy
//!
//! Intercepts every outbound request between an application and its
//! backend, applies per-class caching policies, and falls back to
//! per-trip offline bundles when the network is unreachable.

mod agent;
mod api;
mod config;
mod control;
mod error;
mod fetch;
mod lifecycle;
mod models;
mod router;
mod store;
mod strategy;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use agent::CacheAgent;
use api::{create_router, AppState};
use config::Config;
use fetch::UpstreamClient;

/// Main entry point for the offline agent.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the upstream client with the fetch timeout
/// 4. Install and activate the agent (precache, version GC)
/// 5. Create Axum router with the interception fallback
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "offline_agent=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Offline Agent");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: upstream={}, version={}, port={}, api_limit={}, image_limit={}, fetch_timeout={}s",
        config.upstream_url,
        config.build_version,
        config.server_port,
        config.api_cache_limit,
        config.image_cache_limit,
        config.fetch_timeout_secs
    );

    // Build the upstream fetch boundary
    let origin = Url::parse(&config.upstream_url).context("invalid UPSTREAM_URL")?;
    let fetcher = UpstreamClient::new(origin, config.fetch_timeout_secs)
        .context("failed to build upstream client")?;

    // Register the agent: install (precache + prefetch) and activate (GC)
    let agent = Arc::new(CacheAgent::new(&config, fetcher).context("failed to build agent")?);
    agent
        .start()
        .await
        .context("agent install/activate failed")?;

    // Create router with the interception fallback
    let state = AppState::new(agent);
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Agent listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Agent shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
