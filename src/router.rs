//! Request Router Module
//!
//! Classifies every intercepted request into a policy class. Pure function
//! of URL, method, mode, and destination, evaluated in priority order;
//! anything unrecognized lands in the default class rather than failing
//! closed.

use crate::config::Config;
use crate::fetch::{FetchRequest, RequestDestination};

/// Path extensions treated as images regardless of destination.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg", "avif", "ico"];

// == Route Class ==
/// The policy a request resolves under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    /// Admin paths: network only, never cached
    AdminPassthrough,
    /// Document loads: network with HTTP caching disabled, cache as fallback
    Navigation,
    /// API GET: network-first with progressive caching
    ApiGet,
    /// Image-like: cache-first
    Image,
    /// Build-output assets: stale-while-revalidate
    StaticAsset,
    /// Everything else: plain network-first
    Default,
}

// == Route Rules ==
/// The prefixes and allow-lists classification consults.
#[derive(Debug, Clone)]
pub struct RouteRules {
    pub admin_prefix: String,
    pub api_prefix: String,
    pub static_prefix: String,
    pub image_hosts: Vec<String>,
}

impl RouteRules {
    /// Builds rules from agent configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            image_hosts: config.image_hosts.clone(),
            ..Self::default()
        }
    }
}

impl Default for RouteRules {
    fn default() -> Self {
        Self {
            admin_prefix: "/admin".to_string(),
            api_prefix: "/api".to_string(),
            static_prefix: "/assets/".to_string(),
            image_hosts: Vec::new(),
        }
    }
}

// == Classify ==
/// Assigns the policy class for a request.
pub fn classify(request: &FetchRequest, rules: &RouteRules) -> RouteClass {
    let path = request.url.path();

    if path.starts_with(&rules.admin_prefix) {
        return RouteClass::AdminPassthrough;
    }
    if request.is_navigation() {
        return RouteClass::Navigation;
    }
    if request.method == "GET" && path.starts_with(&rules.api_prefix) {
        return RouteClass::ApiGet;
    }
    if is_image_like(request, rules) {
        return RouteClass::Image;
    }
    if is_static_asset(request, rules) {
        return RouteClass::StaticAsset;
    }

    RouteClass::Default
}

fn is_image_like(request: &FetchRequest, rules: &RouteRules) -> bool {
    if request.destination == RequestDestination::Image {
        return true;
    }
    if let Some(host) = request.url.host_str() {
        if rules
            .image_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
        {
            return true;
        }
    }
    has_image_extension(request.url.path())
}

fn has_image_extension(path: &str) -> bool {
    path.rsplit('.')
        .next()
        .map(|extension| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(extension))
        })
        .unwrap_or(false)
        && path.contains('.')
}

fn is_static_asset(request: &FetchRequest, rules: &RouteRules) -> bool {
    matches!(
        request.destination,
        RequestDestination::Script | RequestDestination::Style
    ) || request.url.path().starts_with(&rules.static_prefix)
}
