//! Response cache middleware.
//!
//! Wraps a route group in [`ResponseCache::with_cache`], keyed by a fixed
//! scope and the request URL. Skips htmx fragment requests, which share their
//! URL with the full page.

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, instrument};

use super::{keys::CacheKey, request::RequestDescriptor, response::ResponseCache};

/// Header htmx sets on partial-page requests.
pub const HTMX_REQUEST_HEADER: &str = "hx-request";

/// Shared cache state for middleware.
#[derive(Clone)]
pub struct CacheState {
    pub cache: ResponseCache,
    /// Key scope for every route behind this layer.
    pub scope: &'static str,
}

impl CacheState {
    pub fn new(cache: ResponseCache, scope: &'static str) -> Self {
        Self { cache, scope }
    }
}

/// Middleware for response caching.
#[instrument(skip_all, fields(scope = state.scope, path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(state): State<CacheState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if is_htmx_request(request.headers()) {
        debug!(cache = "response", outcome = "bypass", reason = "fragment");
        return next.run(request).await;
    }

    let descriptor = RequestDescriptor::from_request(&request);
    let key = CacheKey::new(state.scope, &descriptor.url);
    state
        .cache
        .with_cache(&descriptor, &key, move || next.run(request))
        .await
}

/// Whether the request came from htmx asking for a page fragment.
pub fn is_htmx_request(headers: &HeaderMap) -> bool {
    headers
        .get(HTMX_REQUEST_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == "true")
}
