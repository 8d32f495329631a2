//! Cache-aside wrapper around response producers.

use std::{future::Future, sync::Arc};

use axum::{
    body::Body,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use http_body_util::BodyExt;
use metrics::counter;
use tracing::{debug, instrument, warn};

use crate::application::error::ErrorReport;

use super::{
    clock::{Clock, SystemClock},
    config::CacheConfig,
    entry::{CacheEntry, HttpMetadata},
    keys::CacheKey,
    request::RequestDescriptor,
    store::BlobStore,
};

const SOURCE: &str = "cache::response";

pub const METRIC_RESPONSE_CACHE_HIT: &str = "mediashelf_response_cache_hit_total";
pub const METRIC_RESPONSE_CACHE_MISS: &str = "mediashelf_response_cache_miss_total";
pub const METRIC_RESPONSE_CACHE_BYPASS: &str = "mediashelf_response_cache_bypass_total";
pub const METRIC_RESPONSE_CACHE_STORE_ERROR: &str = "mediashelf_response_cache_store_error_total";

/// Versioned, TTL-bounded response cache over a [`BlobStore`].
#[derive(Clone)]
pub struct ResponseCache {
    config: CacheConfig,
    store: Arc<dyn BlobStore>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(config: CacheConfig, store: Arc<dyn BlobStore>) -> Self {
        Self {
            config,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the wall clock (tests drive time explicitly).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Serve `key` from the store when fresh, otherwise run `compute` and
    /// store its successful result.
    ///
    /// Disabled caching, non-GET methods and authenticated requests go straight
    /// to `compute` without touching the store. Store errors are logged and
    /// never change the returned response.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn with_cache<F, Fut>(
        &self,
        request: &RequestDescriptor,
        key: &CacheKey,
        compute: F,
    ) -> Response
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Response>,
    {
        if let Some(reason) = self.bypass_reason(request) {
            counter!(METRIC_RESPONSE_CACHE_BYPASS).increment(1);
            debug!(cache = "response", outcome = "bypass", reason, "skipping response cache");
            return compute().await;
        }

        let versioned_key = self.config.versioned_key(key);

        if let Some(entry) = self.lookup(&versioned_key).await {
            if entry.is_fresh(self.clock.now()) {
                counter!(METRIC_RESPONSE_CACHE_HIT).increment(1);
                debug!(cache = "response", outcome = "hit", "serving cached response");
                return entry.into_response();
            }
            debug!(
                cache = "response",
                outcome = "stale",
                expires_at = entry.expires_at,
                "cached response expired"
            );
        }

        counter!(METRIC_RESPONSE_CACHE_MISS).increment(1);
        debug!(
            cache = "response",
            outcome = "miss",
            "cache miss, executing handler"
        );
        self.refresh(&versioned_key, compute).await
    }

    fn bypass_reason(&self, request: &RequestDescriptor) -> Option<&'static str> {
        if !self.config.enabled {
            Some("disabled")
        } else if request.method != Method::GET {
            Some("method")
        } else if request.authenticated {
            Some("authenticated")
        } else {
            None
        }
    }

    async fn lookup(&self, versioned_key: &str) -> Option<CacheEntry> {
        match self.store.get(versioned_key).await {
            Ok(object) => object.map(CacheEntry::from_object),
            Err(err) => {
                counter!(METRIC_RESPONSE_CACHE_STORE_ERROR).increment(1);
                warn!(
                    cache = "response",
                    op = "get",
                    error = %err,
                    "blob store read failed, treating as miss"
                );
                None
            }
        }
    }

    async fn refresh<F, Fut>(&self, versioned_key: &str, compute: F) -> Response
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Response>,
    {
        let response = compute().await;

        // Failures pass through and leave any previous entry in place.
        if !response.status().is_success() {
            debug!(
                cache = "response",
                status = response.status().as_u16(),
                "not caching unsuccessful response"
            );
            return response;
        }

        let (parts, body) = response.into_parts();
        let bytes = match BodyExt::collect(body).await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                let mut response = StatusCode::INTERNAL_SERVER_ERROR.into_response();
                ErrorReport::from_message(
                    SOURCE,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("failed to buffer response body: {err}"),
                )
                .attach(&mut response);
                return response;
            }
        };

        let entry = CacheEntry::new(
            bytes.clone(),
            HttpMetadata::from_headers(&parts.headers),
            self.clock.now(),
            self.config.response_ttl_secs,
        );
        let expires_at = entry.expires_at;
        let (body, options) = entry.into_put();

        match self.store.put(versioned_key, body, options).await {
            Ok(()) => debug!(cache = "response", expires_at, "stored response"),
            Err(err) => {
                counter!(METRIC_RESPONSE_CACHE_STORE_ERROR).increment(1);
                warn!(
                    cache = "response",
                    op = "put",
                    error = %err,
                    "blob store write failed, response served uncached"
                );
            }
        }

        Response::from_parts(parts, Body::from(bytes))
    }
}
