//! Network passthrough strategy
//!
//! Admin traffic is forwarded unmodified and never cached; the dispatcher
//! turns a network failure into the generic 503.

use crate::error::Result;
use crate::fetch::{Fetch, FetchOptions, FetchRequest, FetchResponse};
use crate::strategy::StrategyContext;

// == Run ==
pub async fn run<F: Fetch>(
    request: &FetchRequest,
    ctx: &StrategyContext<F>,
) -> Result<FetchResponse> {
    ctx.fetcher.fetch(request, FetchOptions::default()).await
}
