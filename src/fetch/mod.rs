//! Fetch Boundary Module
//!
//! The seam between the agent and the network. Strategies consume the
//! [`Fetch`] trait; production wires [`UpstreamClient`], tests substitute
//! stubs. Transport failures surface as network error variants; a non-2xx
//! response is a normal return value, never an error.

mod client;
mod request;
mod response;

pub use client::UpstreamClient;
pub use request::{CacheMode, FetchOptions, FetchRequest, RequestDestination, RequestMode};
pub use response::FetchResponse;

use async_trait::async_trait;

use crate::error::Result;

// == Fetch Trait ==
/// Performs an outbound fetch with the given option overrides.
#[async_trait]
pub trait Fetch: Send + Sync + 'static {
    async fn fetch(&self, request: &FetchRequest, options: FetchOptions) -> Result<FetchResponse>;
}
