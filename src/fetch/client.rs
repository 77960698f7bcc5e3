//! Upstream HTTP client
//!
//! Production [`Fetch`] implementation backed by reqwest. Carries the
//! explicit fetch timeout so a hung upstream request cannot stall a
//! strategy's resolution chain indefinitely.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, ORIGIN, PRAGMA};
use url::Url;

use crate::error::{AgentError, Result};
use crate::fetch::{CacheMode, Fetch, FetchOptions, FetchRequest, FetchResponse, RequestMode};

// == Upstream Client ==
/// Forwards intercepted requests to the network.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    origin: Url,
    timeout_secs: u64,
}

impl UpstreamClient {
    /// Builds a client with the configured fetch deadline.
    ///
    /// The client carries no cookie store, so cross-origin requests go out
    /// without ambient credentials.
    pub fn new(origin: Url, timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .map_err(|err| AgentError::Internal(err.to_string()))?;

        Ok(Self {
            client,
            origin,
            timeout_secs,
        })
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AgentError {
        if err.is_timeout() {
            AgentError::Timeout(self.timeout_secs)
        } else {
            AgentError::NetworkUnreachable(err.to_string())
        }
    }
}

#[async_trait]
impl Fetch for UpstreamClient {
    async fn fetch(&self, request: &FetchRequest, options: FetchOptions) -> Result<FetchResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes())
            .map_err(|_| AgentError::Internal(format!("bad method: {}", request.method)))?;

        let mut builder = self.client.request(method, request.url.clone());

        if options.cache == CacheMode::NoStore {
            builder = builder
                .header(CACHE_CONTROL, "no-store")
                .header(PRAGMA, "no-cache");
        }
        if options.cors_no_credentials {
            builder = builder.header(ORIGIN, self.origin.as_str().trim_end_matches('/'));
        }

        let response = builder
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.map_transport_error(err))?
            .to_vec();

        let opaque = request.mode == RequestMode::NoCors && request.is_cross_origin(&self.origin);

        Ok(FetchResponse {
            status,
            headers,
            body,
            opaque,
        })
    }
}
