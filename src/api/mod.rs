//! API Module
//!
//! HTTP surface for the agent: the catch-all interception fallback and the
//! reserved `/_agent/*` endpoints.
//!
//! # Endpoints
//! - `POST /_agent/message` - Control channel
//! - `GET /_agent/stats` - Cache statistics
//! - `GET /_agent/health` - Health check
//! - everything else - proxied through the agent

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
